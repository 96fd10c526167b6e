//! Hongbao Engine
//!
//! Off-chain claim-eligibility and allocation engine for red-packet and
//! merkle-distributor style token drops. A creator registers a distribution
//! (total amount, packet count, merkle root, split mode, duration); claims
//! are checked against the eligibility set, allocated a share, recorded
//! idempotently, and paid through the token-ledger collaborator; the refund
//! policy governs the terminal state once the pool is exhausted or the clock
//! has expired.
//!
//! Every state transition for a distribution runs under that distribution's
//! own lock, so claims against one distribution are serialized the way
//! on-chain transaction ordering would serialize them.

pub mod allocator;
pub mod distribution;
pub mod engine;
pub mod entropy;
pub mod events;
pub mod expiry;
pub mod ledger;
pub mod store;
pub mod token;
pub mod verifier;


pub use allocator::RedPacketAllocator;
pub use distribution::{CreateRequest, Distribution};
pub use engine::{ClaimEntry, ClaimRequest, DistributionEngine, EngineConfig};
pub use entropy::{OsEntropy, SeededEntropy};
pub use events::{EngineEvent, EventLog};
pub use ledger::{ClaimLedger, ClaimRecord};
pub use store::DistributionStore;
pub use token::InMemoryTokenLedger;
pub use verifier::StaticVerifier;

use hongbao_core::TokenLedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("distribution not found: {0}")]
    DistributionNotFound(String),
    #[error("distribution already exists: {0}")]
    DuplicateDistribution(String),
    #[error("invalid merkle proof")]
    InvalidProof,
    #[error("already claimed")]
    AlreadyClaimed,
    #[error("all packets already distributed")]
    OutOfStock,
    #[error("distribution expired")]
    Expired,
    #[error("total amount {total} below required {required} for {packets} packets")]
    InsufficientAmount {
        total: u128,
        required: u128,
        packets: u64,
    },
    #[error("packet count must be greater than zero")]
    ZeroPacketCount,
    #[error("packet count {count} exceeds maximum {max}")]
    TooManyPackets { count: u64, max: u64 },
    #[error("nothing to refund")]
    NothingToRefund,
    #[error("already refunded")]
    AlreadyRefunded,
    #[error("refund not available until {expires} (now {now})")]
    NotYetExpired { now: u64, expires: u64 },
    #[error("caller is not the distribution creator")]
    Unauthorized,
    #[error("zero-knowledge proof verification failed")]
    ProofVerificationFailed,
    #[error("token transfer failed: {0}")]
    TokenTransfer(#[from] TokenLedgerError),
}
