//! Serde helpers rendering digests as `0x` hex strings
//!
//! Use with `#[serde(with = "crate::utils::serde_hex::digest")]` and friends.

use crate::crypto::CryptoUtils;
use serde::{Deserialize, Deserializer, Serializer};

pub mod digest {
    use super::*;

    pub fn serialize<S: Serializer>(value: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&CryptoUtils::to_hex(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        CryptoUtils::digest_from_hex(&s).map_err(serde::de::Error::custom)
    }
}

pub mod digest_vec {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(values: &[[u8; 32]], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&CryptoUtils::to_hex(value))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<[u8; 32]>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| CryptoUtils::digest_from_hex(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
