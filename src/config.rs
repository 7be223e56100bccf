//! Tree build configuration

use crate::crypto::HashFunction;
use serde::{Deserialize, Serialize};

/// Candidate tree configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Hash function shared by builder and verifier
    pub hash_function: HashFunction,

    /// Minimum level width hashed on the rayon pool
    pub parallel_threshold: usize,

    /// Leaf cache capacity in entries (0 disables caching)
    pub leaf_cache_size: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            hash_function: HashFunction::Keccak256,
            parallel_threshold: 1024,
            leaf_cache_size: 100_000,
        }
    }
}

impl TreeConfig {
    /// Config that never hashes on the rayon pool
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    pub fn with_hash_function(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_leaf_cache_size(mut self, size: usize) -> Self {
        self.leaf_cache_size = size;
        self
    }
}
