//! Leaf Cache
//!
//! Memoizes candidate leaf digests across tree rebuilds. Many users' candidate
//! pools overlap, so the same address is hashed again and again.

use crate::candidate::CandidateId;
use crate::crypto::HashFunction;
use crate::utils::leaf_hash;
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::num::NonZeroUsize;

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Thread-safe LRU cache of leaf digests
pub struct LeafCache {
    /// (hash function, candidate) -> leaf digest; `None` when disabled
    entries: Option<Mutex<LruCache<(HashFunction, CandidateId), [u8; 32]>>>,
    stats: RwLock<CacheStats>,
}

impl LeafCache {
    /// Create a cache holding up to `capacity` leaves. A capacity of 0
    /// disables caching and every lookup hashes directly.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Leaf digest for `candidate`, computing and storing it on a miss
    pub fn leaf(&self, hash_function: HashFunction, candidate: &CandidateId) -> [u8; 32] {
        let Some(entries) = &self.entries else {
            return leaf_hash(hash_function, candidate);
        };

        let key = (hash_function, *candidate);
        if let Some(leaf) = entries.lock().get(&key).copied() {
            self.stats.write().hits += 1;
            return leaf;
        }

        let leaf = leaf_hash(hash_function, candidate);
        entries.lock().put(key, leaf);
        self.stats.write().misses += 1;
        leaf
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
        }
        *self.stats.write() = CacheStats::default();
    }
}
