use hongbao_core::{Address, Hash32};
use serde::{Deserialize, Serialize};

use crate::hash::{account_leaf, balance_leaf, combine};
use crate::MerkleError;

/// One `(index, account, amount)` eligibility entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub index: u64,
    pub account: Address,
    pub amount: u128,
}

/// A Merkle commitment to an ordered set of eligible claimants.
///
/// All levels are retained so sibling paths can be produced for any leaf.
pub struct EligibilitySet {
    levels: Vec<Vec<Hash32>>,
}

impl EligibilitySet {
    /// Build a tree over indexed `(index, account, amount)` entries.
    pub fn from_balances(entries: &[BalanceEntry]) -> Result<Self, MerkleError> {
        let leaves = entries
            .iter()
            .map(|e| balance_leaf(e.index, &e.account, e.amount))
            .collect();
        Self::from_leaves(leaves)
    }

    /// Build a tree over bare accounts (one claim per address).
    pub fn from_accounts(accounts: &[Address]) -> Result<Self, MerkleError> {
        let leaves = accounts.iter().map(account_leaf).collect();
        Self::from_leaves(leaves)
    }

    /// Build a tree from precomputed leaf hashes.
    pub fn from_leaves(leaves: Vec<Hash32>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptySet);
        }

        let mut levels = vec![leaves];
        while levels.last().map(Vec::len).unwrap_or(0) > 1 {
            let current = levels.last().unwrap();
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for chunk in current.chunks(2) {
                if chunk.len() == 2 {
                    next.push(combine(&chunk[0], &chunk[1]));
                } else {
                    // lone node promoted unchanged
                    next.push(chunk[0]);
                }
            }
            levels.push(next);
        }

        Ok(Self { levels })
    }

    /// The 32-byte Merkle root.
    pub fn root(&self) -> Hash32 {
        self.levels.last().unwrap()[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Leaf hash at `index`.
    pub fn leaf(&self, index: usize) -> Result<Hash32, MerkleError> {
        self.levels[0]
            .get(index)
            .copied()
            .ok_or(MerkleError::IndexOutOfBounds {
                index,
                leaf_count: self.leaf_count(),
            })
    }

    /// Sibling hash path from leaf `index` up to the root.
    ///
    /// Levels where the node was promoted without a sibling contribute no
    /// proof element.
    pub fn proof(&self, index: usize) -> Result<Vec<Hash32>, MerkleError> {
        if index >= self.leaf_count() {
            return Err(MerkleError::IndexOutOfBounds {
                index,
                leaf_count: self.leaf_count(),
            });
        }

        let mut proof = Vec::new();
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = if idx % 2 == 0 { idx + 1 } else { idx - 1 };
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            idx /= 2;
        }
        Ok(proof)
    }
}

/// Recompute the path from `leaf` through `proof` and compare to `root`.
///
/// Pure function; returns false for any malformed or mismatched proof.
pub fn verify(leaf: &Hash32, proof: &[Hash32], root: &Hash32) -> bool {
    let mut running = *leaf;
    for sibling in proof {
        running = combine(&running, sibling);
    }
    running == *root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;

    fn entries(count: usize) -> Vec<BalanceEntry> {
        (0..count)
            .map(|i| BalanceEntry {
                index: i as u64,
                account: [i as u8 + 1; 20],
                amount: 100 + i as u128,
            })
            .collect()
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(
            EligibilitySet::from_balances(&[]),
            Err(MerkleError::EmptySet)
        ));
        assert!(matches!(
            EligibilitySet::from_accounts(&[]),
            Err(MerkleError::EmptySet)
        ));
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let set = EligibilitySet::from_accounts(&[[1u8; 20]]).unwrap();
        assert_eq!(set.root(), account_leaf(&[1u8; 20]));
        assert_eq!(set.proof(0).unwrap().len(), 0);
        assert!(verify(&set.leaf(0).unwrap(), &[], &set.root()));
    }

    #[test]
    fn test_two_leaf_root() {
        let set = EligibilitySet::from_balances(&entries(2)).unwrap();
        let expected = combine(&set.leaf(0).unwrap(), &set.leaf(1).unwrap());
        assert_eq!(set.root(), expected);
    }

    #[test]
    fn test_odd_leaf_promotion() {
        // Three leaves: the third is promoted, not hashed with itself.
        let set = EligibilitySet::from_balances(&entries(3)).unwrap();
        let l0 = set.leaf(0).unwrap();
        let l1 = set.leaf(1).unwrap();
        let l2 = set.leaf(2).unwrap();
        assert_eq!(set.root(), combine(&combine(&l0, &l1), &l2));

        // The promoted leaf's proof skips the bottom level.
        let proof = set.proof(2).unwrap();
        assert_eq!(proof.len(), 1);
        assert_eq!(proof[0], combine(&l0, &l1));
    }

    #[test]
    fn test_round_trip_all_leaves_all_sizes() {
        for size in 1..=9 {
            let entries = entries(size);
            let set = EligibilitySet::from_balances(&entries).unwrap();
            let root = set.root();
            for i in 0..size {
                let leaf = set.leaf(i).unwrap();
                let proof = set.proof(i).unwrap();
                assert!(
                    verify(&leaf, &proof, &root),
                    "round trip failed for leaf {i} of {size}"
                );
            }
        }
    }

    #[test]
    fn test_tampered_amount_rejected() {
        let entries = entries(5);
        let set = EligibilitySet::from_balances(&entries).unwrap();
        let root = set.root();
        let proof = set.proof(2).unwrap();

        let tampered = balance_leaf(2, &entries[2].account, entries[2].amount + 1);
        assert!(!verify(&tampered, &proof, &root));
    }

    #[test]
    fn test_tampered_account_rejected() {
        let entries = entries(5);
        let set = EligibilitySet::from_balances(&entries).unwrap();
        let root = set.root();
        let proof = set.proof(3).unwrap();

        let tampered = balance_leaf(3, &[0xFFu8; 20], entries[3].amount);
        assert!(!verify(&tampered, &proof, &root));
    }

    #[test]
    fn test_tampered_proof_element_rejected() {
        let set = EligibilitySet::from_balances(&entries(6)).unwrap();
        let root = set.root();
        let leaf = set.leaf(0).unwrap();
        let mut proof = set.proof(0).unwrap();
        proof[0][0] = proof[0][0].wrapping_add(1);
        assert!(!verify(&leaf, &proof, &root));
    }

    #[test]
    fn test_proof_for_wrong_leaf_rejected() {
        let set = EligibilitySet::from_balances(&entries(4)).unwrap();
        let root = set.root();
        let proof_for_1 = set.proof(1).unwrap();
        let leaf_0 = set.leaf(0).unwrap();
        assert!(!verify(&leaf_0, &proof_for_1, &root));
    }

    #[test]
    fn test_index_out_of_bounds() {
        let set = EligibilitySet::from_balances(&entries(4)).unwrap();
        assert!(matches!(
            set.proof(4),
            Err(MerkleError::IndexOutOfBounds {
                index: 4,
                leaf_count: 4
            })
        ));
    }

    #[test]
    fn test_deterministic_root() {
        let entries = entries(7);
        let a = EligibilitySet::from_balances(&entries).unwrap();
        let b = EligibilitySet::from_balances(&entries).unwrap();
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_account_mode_round_trip() {
        let accounts: Vec<Address> = (1..=3u8).map(|i| [i; 20]).collect();
        let set = EligibilitySet::from_accounts(&accounts).unwrap();
        let root = set.root();
        for (i, account) in accounts.iter().enumerate() {
            let proof = set.proof(i).unwrap();
            assert!(verify(&account_leaf(account), &proof, &root));
        }
    }

    #[test]
    fn test_from_leaves_matches_from_accounts() {
        let accounts: Vec<Address> = (1..=4u8).map(|i| [i; 20]).collect();
        let leaves: Vec<Hash32> = accounts.iter().map(|a| keccak256(a)).collect();
        let by_accounts = EligibilitySet::from_accounts(&accounts).unwrap();
        let by_leaves = EligibilitySet::from_leaves(leaves).unwrap();
        assert_eq!(by_accounts.root(), by_leaves.root());
    }
}
