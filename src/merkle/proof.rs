//! Candidate Proof Verification
//!
//! Verification needs only the candidate, the sibling path and a root. It
//! never touches the tree, so a relying party holding just the published root
//! can run it. Pairs are hashed in sorted order, which is the same rule an
//! on-chain `MerkleProof.verify` applies, so no direction bits are carried.

use crate::candidate::CandidateId;
use crate::crypto::{CryptoError, CryptoResult, CryptoUtils, HashFunction};
use crate::utils::{hash_sorted_pair, leaf_hash, serde_hex};
use serde::{Deserialize, Serialize};

/// Membership proof for one candidate against one tree snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProof {
    pub candidate: CandidateId,
    #[serde(with = "serde_hex::digest")]
    pub leaf: [u8; 32],
    /// Sibling digests, leaf to root (root excluded)
    #[serde(with = "serde_hex::digest_vec")]
    pub siblings: Vec<[u8; 32]>,
    #[serde(with = "serde_hex::digest")]
    pub root: [u8; 32],
    #[serde(default)]
    pub hash_function: HashFunction,
}

impl CandidateProof {
    /// Verify against the root captured when the proof was generated
    pub fn verify(&self) -> bool {
        self.verify_against(&self.root)
    }

    /// Verify against an externally supplied root (e.g. the one on chain)
    pub fn verify_against(&self, root: &[u8; 32]) -> bool {
        MerkleProofVerifier::new(self.hash_function).verify(&self.candidate, &self.siblings, root)
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    pub fn to_json(&self) -> CryptoResult<String> {
        serde_json::to_string(self).map_err(|e| CryptoError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> CryptoResult<Self> {
        serde_json::from_str(json).map_err(|e| CryptoError::SerializationError(e.to_string()))
    }
}

/// Keccak-256 verification of `proof` for `candidate` under `root`
pub fn verify_proof(candidate: &CandidateId, proof: &[[u8; 32]], root: &[u8; 32]) -> bool {
    MerkleProofVerifier::default().verify(candidate, proof, root)
}

/// Fold a sibling path into the root it implies
pub fn compute_root(hash_function: HashFunction, leaf: [u8; 32], proof: &[[u8; 32]]) -> [u8; 32] {
    proof
        .iter()
        .fold(leaf, |acc, sibling| hash_sorted_pair(hash_function, &acc, sibling))
}

/// Merkle proof verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct MerkleProofVerifier {
    pub hash_function: HashFunction,
}

impl MerkleProofVerifier {
    pub fn new(hash_function: HashFunction) -> Self {
        Self { hash_function }
    }

    /// Verify a raw sibling path. A mismatch is a normal `false`.
    pub fn verify(&self, candidate: &CandidateId, proof: &[[u8; 32]], root: &[u8; 32]) -> bool {
        let leaf = leaf_hash(self.hash_function, candidate);
        let computed = compute_root(self.hash_function, leaf, proof);
        CryptoUtils::constant_time_eq(&computed, root)
    }

    /// Verify a raw identifier; only a malformed identifier is an error
    pub fn verify_bytes(&self, identifier: &[u8], proof: &[[u8; 32]], root: &[u8; 32]) -> CryptoResult<bool> {
        let candidate = CandidateId::from_slice(identifier)?;
        Ok(self.verify(&candidate, proof, root))
    }

    /// Verify a bundled proof against an expected root.
    ///
    /// The root embedded in the proof is ignored; only `root` is trusted.
    pub fn verify_proof(&self, proof: &CandidateProof, root: &[u8; 32]) -> bool {
        proof.hash_function == self.hash_function && self.verify(&proof.candidate, &proof.siblings, root)
    }

    /// All-or-nothing batch verification against a single root
    pub fn batch_verify(&self, proofs: &[CandidateProof], root: &[u8; 32]) -> bool {
        proofs.iter().all(|proof| self.verify_proof(proof, root))
    }

    /// Accept the proof if it matches any of the known roots.
    ///
    /// Used while a rebuilt candidate set is rolling out and both the old and
    /// the new root are still honoured.
    pub fn verify_against_roots(&self, proof: &CandidateProof, roots: &[[u8; 32]]) -> bool {
        if proof.hash_function != self.hash_function {
            return false;
        }
        let leaf = leaf_hash(self.hash_function, &proof.candidate);
        let computed = compute_root(self.hash_function, leaf, &proof.siblings);
        roots.iter().any(|root| CryptoUtils::constant_time_eq(&computed, root))
    }
}
