//! Hongbao Core
//!
//! Generic types, collaborator traits, and constants shared by all Hongbao
//! crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account address, 20 bytes.
pub type Address = [u8; 20];

/// 32-byte hash value.
pub type Hash32 = [u8; 32];

/// Distribution identifier, derived from `keccak256(creator || message)`.
pub type DistributionId = Hash32;

/// Sentinel hash. A distribution with `hash_lock == ZERO_HASH` is not
/// password-gated.
pub const ZERO_HASH: Hash32 = [0u8; 32];

/// Payout asset class for a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenType {
    Native = 0,
    Fungible = 1,
}

impl TokenType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Native),
            1 => Some(Self::Fungible),
            _ => None,
        }
    }
}

/// Per-distribution idempotence key for a claim.
///
/// The indexed distributor variant keys claims by leaf index; the red-packet
/// free-claim variant keys by claimant address (one claim per address).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKey {
    Index(u64),
    Account(Address),
}

/// Groth16-shaped proof payload for password-gated claims.
///
/// The engine never inspects the field elements; they are passed through to
/// the [`ProofVerifier`] collaborator as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkProof {
    pub a: [Hash32; 2],
    pub b: [[Hash32; 2]; 2],
    pub c: [Hash32; 2],
}

/// Errors surfaced by a [`TokenLedger`] collaborator.
#[derive(Error, Debug)]
pub enum TokenLedgerError {
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u128, need: u128 },
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// External token ledger capability.
///
/// `transfer` pays out from the escrow the ledger fronts for; `transfer_from`
/// pulls approved funds into it. Failure of either must abort the enclosing
/// claim/create/refund operation.
pub trait TokenLedger {
    fn transfer(&self, to: Address, amount: u128) -> Result<(), TokenLedgerError>;

    fn transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenLedgerError>;

    /// EIP-2612 style approval. The signature components are opaque to the
    /// engine; implementations decide whether to validate them.
    #[allow(clippy::too_many_arguments)]
    fn permit(
        &self,
        owner: Address,
        spender: Address,
        value: u128,
        deadline: u64,
        v: u8,
        r: Hash32,
        s: Hash32,
    ) -> Result<(), TokenLedgerError>;
}

/// Opaque zero-knowledge proof verifier.
///
/// Soundness of the proof system is out of scope; the engine's contract is
/// "claim succeeds only if this returns true for the stored hash lock".
pub trait ProofVerifier {
    fn verify_proof(&self, proof: &ZkProof, public_signals: &[Hash32]) -> bool;
}

/// Injectable randomness for the random-split allocator.
///
/// Seedable implementations keep payout sequences reproducible in tests.
pub trait EntropySource {
    fn next_random(&mut self) -> u128;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_from_u8() {
        assert_eq!(TokenType::from_u8(0), Some(TokenType::Native));
        assert_eq!(TokenType::from_u8(1), Some(TokenType::Fungible));
        assert_eq!(TokenType::from_u8(2), None);
    }

    #[test]
    fn test_token_type_repr() {
        assert_eq!(TokenType::Native as u8, 0);
        assert_eq!(TokenType::Fungible as u8, 1);
    }

    #[test]
    fn test_claim_key_distinguishes_variants() {
        let by_index = ClaimKey::Index(0);
        let by_account = ClaimKey::Account([0u8; 20]);
        assert_ne!(by_index, by_account);
        assert_eq!(by_index, ClaimKey::Index(0));
    }

    #[test]
    fn test_zk_proof_serde() {
        let proof = ZkProof {
            a: [[1u8; 32], [2u8; 32]],
            b: [[[3u8; 32], [4u8; 32]], [[5u8; 32], [6u8; 32]]],
            c: [[7u8; 32], [8u8; 32]],
        };
        let json = serde_json::to_string(&proof).unwrap();
        let parsed: ZkProof = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, proof);
    }
}
