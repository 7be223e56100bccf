//! Merkle Tree Module
//! Candidate-set Merkle trees with sort-before-hash pairing
pub mod candidate_tree;
pub mod leaf_cache;
pub mod proof;

// Re-export main types
pub use candidate_tree::{CandidateMerkleTree, CandidateTreeBuilder, TreeStats};
pub use leaf_cache::{CacheStats, LeafCache};
pub use proof::{compute_root, verify_proof, CandidateProof, MerkleProofVerifier};
