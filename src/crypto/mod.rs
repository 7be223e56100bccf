//! Cryptographic Primitives Module
//!
//! Error taxonomy, hash function selection and small byte utilities shared
//! by the candidate tree, the proof verifier and the leaf cache.

use serde::{Deserialize, Serialize};
use sha2::Digest;

/// Cryptographic error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Candidate set is empty")]
    EmptyCandidateSet,

    #[error("Invalid input kind: {0}")]
    InvalidInputKind(String),

    #[error("Candidate not found: {0}")]
    CandidateNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Supported hash functions
///
/// The tree builder and any downstream verifier must agree on this bit for bit.
/// `Keccak256` matches the EVM `keccak256` opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashFunction {
    /// Keccak-256
    #[default]
    Keccak256,
    /// SHA-256
    Sha256,
}

impl HashFunction {
    /// Hash a byte slice with the selected function
    pub fn digest(&self, data: &[u8]) -> [u8; 32] {
        match self {
            HashFunction::Keccak256 => CryptoUtils::keccak256(data),
            HashFunction::Sha256 => CryptoUtils::sha256(data),
        }
    }
}

/// Cryptographic utilities
pub struct CryptoUtils;

impl CryptoUtils {
    /// Hash data with SHA-256
    pub fn sha256(data: &[u8]) -> [u8; 32] {
        sha2::Sha256::digest(data).into()
    }

    /// Hash data with Keccak-256
    pub fn keccak256(data: &[u8]) -> [u8; 32] {
        sha3::Keccak256::digest(data).into()
    }

    /// Constant-time comparison of byte arrays
    pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
        use subtle::ConstantTimeEq;
        a.ct_eq(b).into()
    }

    /// Convert bytes to `0x`-prefixed lowercase hex
    pub fn to_hex(bytes: &[u8]) -> String {
        format!("0x{}", hex::encode(bytes))
    }

    /// Convert hex string (with or without `0x`) to bytes
    pub fn from_hex(s: &str) -> CryptoResult<Vec<u8>> {
        let s = s.trim();
        let stripped = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        hex::decode(stripped).map_err(|e| CryptoError::SerializationError(e.to_string()))
    }

    /// Decode a hex string into a 32-byte digest
    pub fn digest_from_hex(s: &str) -> CryptoResult<[u8; 32]> {
        let bytes = Self::from_hex(s)?;
        <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
            CryptoError::SerializationError(format!("expected 32-byte digest, got {} bytes", bytes.len()))
        })
    }
}
