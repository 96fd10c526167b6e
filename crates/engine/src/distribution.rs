//! Distribution state: creation parameters plus the live claim ledger.

use hongbao_core::{Address, DistributionId, Hash32, TokenType, ZERO_HASH};

use crate::expiry;
use crate::ledger::ClaimLedger;

/// Parameters for registering a new distribution.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub creator: Address,
    pub merkle_root: Hash32,
    /// Password commitment; `ZERO_HASH` means no password required.
    pub hash_lock: Hash32,
    pub packet_count: u64,
    pub is_random_split: bool,
    /// Claim window length in seconds from creation.
    pub duration: u64,
    pub message: String,
    pub name: String,
    pub token_type: TokenType,
    pub token_address: Address,
    pub total_amount: u128,
}

/// One registered distribution.
///
/// Creation parameters are immutable; mutable state lives in the ledger and
/// the `refunded` flag, and is only ever touched under the distribution's
/// store lock.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub id: DistributionId,
    pub creator: Address,
    pub merkle_root: Hash32,
    pub token_type: TokenType,
    pub token_address: Address,
    pub total_amount: u128,
    pub packet_count: u64,
    pub is_random_split: bool,
    pub creation_time: u64,
    pub duration: u64,
    pub hash_lock: Hash32,
    pub name: String,
    pub message: String,
    pub refunded: bool,
    pub ledger: ClaimLedger,
}

impl Distribution {
    pub fn new(id: DistributionId, req: CreateRequest, creation_time: u64) -> Self {
        let ledger = ClaimLedger::new(req.total_amount, req.packet_count);
        Self {
            id,
            creator: req.creator,
            merkle_root: req.merkle_root,
            token_type: req.token_type,
            token_address: req.token_address,
            total_amount: req.total_amount,
            packet_count: req.packet_count,
            is_random_split: req.is_random_split,
            creation_time,
            duration: req.duration,
            hash_lock: req.hash_lock,
            name: req.name,
            message: req.message,
            refunded: false,
            ledger,
        }
    }

    pub fn expire_timestamp(&self) -> u64 {
        expiry::expire_timestamp(self.creation_time, self.duration)
    }

    pub fn is_password_gated(&self) -> bool {
        self.hash_lock != ZERO_HASH
    }

    pub fn all_claimed(&self) -> bool {
        self.ledger.all_claimed()
    }
}
