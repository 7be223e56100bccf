//! Hash Utilities
//! Leaf encoding and commutative pair hashing shared by builder and verifier

use crate::candidate::CandidateId;
use crate::crypto::{CryptoResult, HashFunction};

/// Packed leaf encoding of a candidate.
///
/// Same bytes as Solidity `abi.encodePacked(address)`: the raw 20 address
/// bytes, no length prefix and no padding.
pub fn encode_candidate(candidate: &CandidateId) -> [u8; 20] {
    *candidate.as_bytes()
}

/// Leaf digest of one candidate: `Hash(encodePacked(candidate))`
pub fn leaf_hash(hash_function: HashFunction, candidate: &CandidateId) -> [u8; 32] {
    hash_function.digest(&encode_candidate(candidate))
}

/// Leaf digest of a raw identifier; fails unless it is exactly 20 bytes
pub fn leaf_hash_bytes(hash_function: HashFunction, identifier: &[u8]) -> CryptoResult<[u8; 32]> {
    let candidate = CandidateId::from_slice(identifier)?;
    Ok(leaf_hash(hash_function, &candidate))
}

/// Hash two nodes in sorted order: `Hash(min(a, b) || max(a, b))`
pub fn hash_sorted_pair(hash_function: HashFunction, a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(lo);
    data[32..].copy_from_slice(hi);
    hash_function.digest(&data)
}
