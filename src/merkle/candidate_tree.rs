//! Candidate Merkle Tree
//!
//! Binary Merkle tree over an ordered candidate list. Level 0 is padded to a
//! power of two (at least 2) by repeating the last leaf, every parent is
//! `Hash(min(a, b) || max(a, b))`, and all levels are kept so that proofs can
//! be read straight off the structure.
//!
//! Candidate order is significant: the same members in a different order give
//! a different root. Callers that need reproducible roots must supply a stable
//! ordering.

use crate::candidate::CandidateId;
use crate::config::TreeConfig;
use crate::crypto::{CryptoError, CryptoResult, HashFunction};
use crate::merkle::leaf_cache::{CacheStats, LeafCache};
use crate::merkle::proof::CandidateProof;
use crate::utils::{hash_sorted_pair, leaf_hash};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable Merkle tree over one candidate snapshot
#[derive(Debug, Clone)]
pub struct CandidateMerkleTree {
    hash_function: HashFunction,
    parallel_threshold: usize,
    /// Original (unpadded) candidate list in input order
    candidates: Vec<CandidateId>,
    /// Original candidate -> leaf digest
    candidate_leaves: HashMap<CandidateId, [u8; 32]>,
    /// Level 0 = padded leaves, last level = [root]
    levels: Vec<Vec<[u8; 32]>>,
}

/// Summary of a built tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub candidate_count: usize,
    pub padded_leaf_count: usize,
    pub depth: usize,
    pub root: [u8; 32],
    pub nodes_stored: usize,
}

impl CandidateMerkleTree {
    /// Build with the default configuration (Keccak-256)
    pub fn build(candidates: &[CandidateId]) -> CryptoResult<Self> {
        Self::build_with_config(candidates, &TreeConfig::default())
    }

    /// Build from raw identifiers; each must be exactly 20 bytes
    pub fn build_from_bytes<B: AsRef<[u8]>>(identifiers: &[B], config: &TreeConfig) -> CryptoResult<Self> {
        let candidates = identifiers
            .iter()
            .map(|id| CandidateId::from_slice(id.as_ref()))
            .collect::<CryptoResult<Vec<_>>>()?;
        Self::build_with_config(&candidates, config)
    }

    pub fn build_with_config(candidates: &[CandidateId], config: &TreeConfig) -> CryptoResult<Self> {
        let hash_function = config.hash_function;
        Self::build_with_leaf_fn(candidates, config, |candidate| leaf_hash(hash_function, candidate))
    }

    /// Build using a shared leaf cache
    pub fn build_with_cache(
        candidates: &[CandidateId],
        config: &TreeConfig,
        cache: &LeafCache,
    ) -> CryptoResult<Self> {
        let hash_function = config.hash_function;
        Self::build_with_leaf_fn(candidates, config, |candidate| cache.leaf(hash_function, candidate))
    }

    fn build_with_leaf_fn<F>(candidates: &[CandidateId], config: &TreeConfig, leaf_fn: F) -> CryptoResult<Self>
    where
        F: Fn(&CandidateId) -> [u8; 32] + Sync,
    {
        if candidates.is_empty() {
            return Err(CryptoError::EmptyCandidateSet);
        }

        let hash_function = config.hash_function;
        let parallel = candidates.len() >= config.parallel_threshold;

        let real_leaves: Vec<[u8; 32]> = if parallel {
            candidates.par_iter().map(&leaf_fn).collect()
        } else {
            candidates.iter().map(&leaf_fn).collect()
        };

        let candidate_leaves: HashMap<CandidateId, [u8; 32]> = candidates
            .iter()
            .copied()
            .zip(real_leaves.iter().copied())
            .collect();

        let mut leaves = real_leaves;
        let padded_len = leaves.len().next_power_of_two().max(2);
        if padded_len != leaves.len() {
            log::debug!("padding {} leaves to {}", leaves.len(), padded_len);
            let last = leaves[leaves.len() - 1];
            leaves.resize(padded_len, last);
        }

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let next = next_level(
                hash_function,
                &levels[levels.len() - 1],
                config.parallel_threshold,
            );
            levels.push(next);
        }

        let tree = Self {
            hash_function,
            parallel_threshold: config.parallel_threshold,
            candidates: candidates.to_vec(),
            candidate_leaves,
            levels,
        };

        log::debug!(
            "built candidate tree: {} candidates, {} leaves, depth {}, root {}",
            tree.candidate_count(),
            tree.leaf_count(),
            tree.depth(),
            hex::encode(tree.root())
        );

        Ok(tree)
    }

    /// Root digest
    pub fn root(&self) -> [u8; 32] {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn hash_function(&self) -> HashFunction {
        self.hash_function
    }

    /// All levels, bottom (padded leaves) to top (root)
    pub fn levels(&self) -> &[Vec<[u8; 32]>] {
        &self.levels
    }

    /// Padded level-0 leaves
    pub fn leaves(&self) -> &[[u8; 32]] {
        &self.levels[0]
    }

    /// Original candidates in input order
    pub fn candidates(&self) -> &[CandidateId] {
        &self.candidates
    }

    /// Original candidate -> leaf mapping
    pub fn candidate_leaves(&self) -> &HashMap<CandidateId, [u8; 32]> {
        &self.candidate_leaves
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Padded leaf count (power of two, at least 2)
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of hashing levels above the leaves; also the proof length
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Membership in the original list; padding does not count
    pub fn contains(&self, candidate: &CandidateId) -> bool {
        self.candidate_leaves.contains_key(candidate)
    }

    pub fn leaf(&self, candidate: &CandidateId) -> Option<[u8; 32]> {
        self.candidate_leaves.get(candidate).copied()
    }

    /// First position of the candidate's leaf in padded level 0
    pub fn leaf_index(&self, candidate: &CandidateId) -> Option<usize> {
        let leaf = self.leaf(candidate)?;
        self.levels[0].iter().position(|l| *l == leaf)
    }

    /// Sibling path for `candidate`, leaf to root
    pub fn proof_path(&self, candidate: &CandidateId) -> CryptoResult<Vec<[u8; 32]>> {
        let mut index = self.leaf_index(candidate).ok_or_else(|| {
            log::warn!("proof requested for non-member {}", candidate);
            CryptoError::CandidateNotFound(candidate.to_hex())
        })?;

        let mut path = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.levels.len() - 1] {
            if let Some(sibling) = level.get(index ^ 1) {
                path.push(*sibling);
            }
            index /= 2;
        }
        Ok(path)
    }

    /// Bundled proof for `candidate` against this tree's root
    pub fn proof(&self, candidate: &CandidateId) -> CryptoResult<CandidateProof> {
        let siblings = self.proof_path(candidate)?;
        Ok(CandidateProof {
            candidate: *candidate,
            leaf: self.candidate_leaves[candidate],
            siblings,
            root: self.root(),
            hash_function: self.hash_function,
        })
    }

    /// Proofs for every original candidate, in input order
    pub fn proofs(&self) -> CryptoResult<Vec<CandidateProof>> {
        if self.candidates.len() >= self.parallel_threshold {
            self.candidates.par_iter().map(|c| self.proof(c)).collect()
        } else {
            self.candidates.iter().map(|c| self.proof(c)).collect()
        }
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            candidate_count: self.candidate_count(),
            padded_leaf_count: self.leaf_count(),
            depth: self.depth(),
            root: self.root(),
            nodes_stored: self.levels.iter().map(Vec::len).sum(),
        }
    }
}

/// Pair adjacent nodes and hash each pair in sorted order
fn next_level(hash_function: HashFunction, level: &[[u8; 32]], parallel_threshold: usize) -> Vec<[u8; 32]> {
    let hash_chunk = |pair: &[[u8; 32]]| match pair {
        [a, b] => hash_sorted_pair(hash_function, a, b),
        [a] => hash_sorted_pair(hash_function, a, a),
        _ => unreachable!("chunks(2) yields one or two nodes"),
    };

    if level.len() >= parallel_threshold {
        level.par_chunks(2).map(hash_chunk).collect()
    } else {
        level.chunks(2).map(hash_chunk).collect()
    }
}

/// Builds trees for many candidate pools with one shared leaf cache
pub struct CandidateTreeBuilder {
    config: TreeConfig,
    cache: Arc<LeafCache>,
}

impl CandidateTreeBuilder {
    pub fn new(config: TreeConfig) -> Self {
        let cache = Arc::new(LeafCache::new(config.leaf_cache_size));
        Self { config, cache }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn build(&self, candidates: &[CandidateId]) -> CryptoResult<CandidateMerkleTree> {
        CandidateMerkleTree::build_with_cache(candidates, &self.config, &self.cache)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for CandidateTreeBuilder {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::proof::verify_proof;

    fn addr(first: u8, last: u8) -> CandidateId {
        let mut bytes = [first; 20];
        bytes[19] = last;
        CandidateId::new(bytes)
    }

    fn three_candidates() -> Vec<CandidateId> {
        vec![addr(0xaa, 0x01), addr(0xbb, 0x02), addr(0xcc, 0x03)]
    }

    #[test]
    fn test_empty_candidate_set() {
        let err = CandidateMerkleTree::build(&[]).unwrap_err();
        assert_eq!(err, CryptoError::EmptyCandidateSet);
    }

    #[test]
    fn test_three_candidates_pad_to_four() {
        let candidates = three_candidates();
        let tree = CandidateMerkleTree::build(&candidates).unwrap();

        assert_eq!(tree.levels().len(), 3);
        assert_eq!(tree.levels()[0].len(), 4);
        assert_eq!(tree.levels()[1].len(), 2);
        assert_eq!(tree.levels()[2].len(), 1);
        assert_eq!(tree.leaves()[3], tree.leaves()[2]);
        assert_eq!(tree.candidate_count(), 3);

        let proof = tree.proof(&candidates[1]).unwrap();
        assert_eq!(proof.len(), 2);
        assert!(proof.verify());

        let l = tree.leaves();
        let left = hash_sorted_pair(HashFunction::Keccak256, &l[0], &l[1]);
        let right = hash_sorted_pair(HashFunction::Keccak256, &l[2], &l[3]);
        assert_eq!(tree.root(), hash_sorted_pair(HashFunction::Keccak256, &left, &right));
        assert_eq!(proof.siblings, vec![l[0], right]);
    }

    #[test]
    fn test_single_candidate() {
        let only = addr(0xaa, 0x01);
        let tree = CandidateMerkleTree::build(&[only]).unwrap();
        let leaf = leaf_hash(HashFunction::Keccak256, &only);

        assert_eq!(tree.leaves(), &[leaf, leaf]);
        assert_eq!(tree.root(), hash_sorted_pair(HashFunction::Keccak256, &leaf, &leaf));

        let path = tree.proof_path(&only).unwrap();
        assert_eq!(path, vec![leaf]);
        assert!(verify_proof(&only, &path, &tree.root()));
    }

    #[test]
    fn test_power_of_two_is_not_padded() {
        let candidates: Vec<_> = (0..8u8).map(|i| addr(i, i)).collect();
        let tree = CandidateMerkleTree::build(&candidates).unwrap();
        assert_eq!(tree.leaf_count(), 8);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.stats().nodes_stored, 15);
    }

    #[test]
    fn test_every_level_halves() {
        for n in 1..=33u8 {
            let candidates: Vec<_> = (0..n).map(|i| addr(i, 0x55)).collect();
            let tree = CandidateMerkleTree::build(&candidates).unwrap();
            assert!(tree.leaf_count().is_power_of_two());
            assert!(tree.leaf_count() >= 2);
            for pair in tree.levels().windows(2) {
                assert_eq!(pair[1].len(), pair[0].len() / 2);
            }
        }
    }

    #[test]
    fn test_all_members_verify() {
        let candidates: Vec<_> = (0..13u8).map(|i| addr(i, 0xee)).collect();
        let tree = CandidateMerkleTree::build(&candidates).unwrap();

        let proofs = tree.proofs().unwrap();
        assert_eq!(proofs.len(), candidates.len());
        for (candidate, proof) in candidates.iter().zip(&proofs) {
            assert_eq!(&proof.candidate, candidate);
            assert_eq!(proof.len(), tree.depth());
            assert!(verify_proof(candidate, &proof.siblings, &tree.root()));
        }
    }

    #[test]
    fn test_non_member_not_found() {
        let tree = CandidateMerkleTree::build(&three_candidates()).unwrap();
        let stranger = addr(0xdd, 0x04);

        assert!(!tree.contains(&stranger));
        assert_eq!(tree.leaf_index(&stranger), None);
        assert!(matches!(
            tree.proof(&stranger),
            Err(CryptoError::CandidateNotFound(_))
        ));
    }

    #[test]
    fn test_leaf_index_first_match() {
        let candidates = three_candidates();
        let tree = CandidateMerkleTree::build(&candidates).unwrap();
        assert_eq!(tree.leaf_index(&candidates[0]), Some(0));
        assert_eq!(tree.leaf_index(&candidates[2]), Some(2));
    }

    #[test]
    fn test_duplicate_candidates_in_input() {
        let a = addr(0x01, 0x01);
        let b = addr(0x02, 0x02);
        let tree = CandidateMerkleTree::build(&[a, b, a]).unwrap();

        assert_eq!(tree.candidate_count(), 3);
        assert_eq!(tree.candidate_leaves().len(), 2);
        assert!(tree.proof(&a).unwrap().verify());
    }

    #[test]
    fn test_order_sensitivity() {
        let candidates = three_candidates();
        let mut reversed = candidates.clone();
        reversed.reverse();

        let forward = CandidateMerkleTree::build(&candidates).unwrap();
        let backward = CandidateMerkleTree::build(&reversed).unwrap();
        assert_ne!(forward.root(), backward.root());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let candidates: Vec<_> = (0..=200u8).map(|i| addr(i, i.wrapping_mul(7))).collect();

        let sequential = CandidateMerkleTree::build_with_config(&candidates, &TreeConfig::sequential()).unwrap();
        let parallel = CandidateMerkleTree::build_with_config(
            &candidates,
            &TreeConfig::default().with_parallel_threshold(2),
        )
        .unwrap();

        assert_eq!(sequential.levels(), parallel.levels());
        assert_eq!(sequential.proofs().unwrap(), parallel.proofs().unwrap());
    }

    #[test]
    fn test_build_from_bytes() {
        let raw = vec![vec![0x11u8; 20], vec![0x22u8; 20]];
        let tree = CandidateMerkleTree::build_from_bytes(&raw, &TreeConfig::default()).unwrap();
        assert!(tree.contains(&CandidateId::new([0x22; 20])));

        let bad = vec![vec![0x11u8; 20], vec![0x22u8; 32]];
        assert!(matches!(
            CandidateMerkleTree::build_from_bytes(&bad, &TreeConfig::default()),
            Err(CryptoError::InvalidInputKind(_))
        ));
    }

    #[test]
    fn test_sha256_tree() {
        let config = TreeConfig::default().with_hash_function(HashFunction::Sha256);
        let candidates = three_candidates();
        let tree = CandidateMerkleTree::build_with_config(&candidates, &config).unwrap();
        let keccak_tree = CandidateMerkleTree::build(&candidates).unwrap();

        assert_ne!(tree.root(), keccak_tree.root());
        let proof = tree.proof(&candidates[0]).unwrap();
        assert_eq!(proof.hash_function, HashFunction::Sha256);
        assert!(proof.verify());
        assert!(!verify_proof(&candidates[0], &proof.siblings, &tree.root()));
    }

    #[test]
    fn test_builder_shares_cache() {
        let builder = CandidateTreeBuilder::default();
        let pool_a = three_candidates();
        let pool_b = vec![addr(0xbb, 0x02), addr(0xdd, 0x04)];

        let tree_a = builder.build(&pool_a).unwrap();
        let tree_b = builder.build(&pool_b).unwrap();

        let stats = builder.cache_stats();
        assert_eq!(stats.misses, 4);
        assert_eq!(stats.hits, 1);
        assert_eq!(tree_a.root(), CandidateMerkleTree::build(&pool_a).unwrap().root());
        assert_eq!(tree_b.root(), CandidateMerkleTree::build(&pool_b).unwrap().root());
    }

    #[test]
    fn test_tree_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CandidateMerkleTree>();
        assert_send_sync::<CandidateTreeBuilder>();
    }
}
