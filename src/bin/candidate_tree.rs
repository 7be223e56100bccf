//! Candidate Tree CLI
//!
//! Builds the Merkle tree for a candidate file (one address per line) and
//! prints the root, tree stats and every member's proof as JSON.
//!
//! Usage: candidate-tree <candidates-file> [--config <tree-config.json>]

use anyhow::{bail, Context, Result};
use candidate_merkle::utils::serde_hex;
use candidate_merkle::{parse_candidate_list, CandidateMerkleTree, CandidateProof, HashFunction, TreeConfig};
use serde::Serialize;
use std::env;
use std::fs;

#[derive(Serialize)]
struct TreeReport {
    #[serde(with = "serde_hex::digest")]
    root: [u8; 32],
    hash_function: HashFunction,
    candidate_count: usize,
    padded_leaf_count: usize,
    depth: usize,
    proofs: Vec<CandidateProof>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (candidates_path, config_path) = match args.as_slice() {
        [path] => (path.as_str(), None),
        [path, flag, config] if flag == "--config" => (path.as_str(), Some(config.as_str())),
        _ => bail!("usage: candidate-tree <candidates-file> [--config <tree-config.json>]"),
    };

    let config = match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
            serde_json::from_str::<TreeConfig>(&raw).with_context(|| format!("parsing config {}", path))?
        }
        None => TreeConfig::default(),
    };

    let raw = fs::read_to_string(candidates_path)
        .with_context(|| format!("reading candidates {}", candidates_path))?;
    let candidates = parse_candidate_list(&raw)?;
    log::info!("loaded {} candidates from {}", candidates.len(), candidates_path);

    let tree = CandidateMerkleTree::build_with_config(&candidates, &config)?;
    let stats = tree.stats();

    let report = TreeReport {
        root: stats.root,
        hash_function: tree.hash_function(),
        candidate_count: stats.candidate_count,
        padded_leaf_count: stats.padded_leaf_count,
        depth: stats.depth,
        proofs: tree.proofs()?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
