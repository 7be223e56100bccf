//! Utils Module
pub mod hash_utils;
pub mod serde_hex;

// Re-export main types
pub use hash_utils::*;
