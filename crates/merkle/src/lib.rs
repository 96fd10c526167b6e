//! Hongbao Merkle
//!
//! Deterministic Merkle trees over claim-eligibility entries, with proof
//! generation and pure verification.
//!
//! Children are sorted by byte value before hashing at every level, so proof
//! verification is independent of left/right position. A lone node at an
//! odd-length level is promoted to the next level unchanged.

mod hash;
mod tree;

use thiserror::Error;

pub use hash::{account_leaf, balance_leaf, combine, keccak256};
pub use tree::{verify, BalanceEntry, EligibilitySet};

#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("cannot build a tree from zero entries")]
    EmptySet,
    #[error("leaf index {index} out of bounds for {leaf_count} leaves")]
    IndexOutOfBounds { index: usize, leaf_count: usize },
}
