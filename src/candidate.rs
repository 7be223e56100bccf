//! Candidate identifiers
//!
//! A candidate is an account address: 20 raw bytes, copied by value.

use crate::crypto::{CryptoError, CryptoResult, CryptoUtils};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Width of a candidate identifier in bytes
pub const CANDIDATE_ID_LEN: usize = 20;

/// Fixed-width candidate identifier (an account address)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId([u8; CANDIDATE_ID_LEN]);

impl CandidateId {
    pub const fn new(bytes: [u8; CANDIDATE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a raw slice, rejecting anything that is not exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let raw = <[u8; CANDIDATE_ID_LEN]>::try_from(bytes).map_err(|_| {
            CryptoError::InvalidInputKind(format!(
                "candidate identifier must be {} bytes, got {}",
                CANDIDATE_ID_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; CANDIDATE_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        CryptoUtils::to_hex(&self.0)
    }
}

impl From<[u8; CANDIDATE_ID_LEN]> for CandidateId {
    fn from(bytes: [u8; CANDIDATE_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for CandidateId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for CandidateId {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = CryptoUtils::from_hex(s)
            .map_err(|e| CryptoError::InvalidInputKind(format!("{:?} is not an address: {}", s, e)))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CandidateId({})", self.to_hex())
    }
}

impl Serialize for CandidateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a newline separated list of addresses.
///
/// Blank lines and `#` comments are skipped; order is preserved.
pub fn parse_candidate_list(input: &str) -> CryptoResult<Vec<CandidateId>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(CandidateId::from_str)
        .collect()
}
