//! Merkle authorization over candidate sets.
//!
//! A user's candidate pool is committed to a single 32-byte root. Any member
//! can later show a short sibling path proving it belongs to that pool, and a
//! relying party holding only the root checks it with [`verify_proof`].

pub mod candidate;
pub mod config;
pub mod crypto;
pub mod merkle;
pub mod utils;

// Re-export main types for easy access
pub use candidate::{parse_candidate_list, CandidateId, CANDIDATE_ID_LEN};
pub use config::TreeConfig;
pub use crypto::{CryptoError, CryptoResult, CryptoUtils, HashFunction};
pub use merkle::{
    compute_root, verify_proof, CacheStats, CandidateMerkleTree, CandidateProof, CandidateTreeBuilder,
    LeafCache, MerkleProofVerifier, TreeStats,
};
pub use utils::{hash_sorted_pair, leaf_hash, leaf_hash_bytes};
