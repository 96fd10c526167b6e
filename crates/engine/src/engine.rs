//! Create / claim / refund orchestration over the distribution store.
//!
//! Ordering inside every operation is checks, then ledger effects, then the
//! token-transfer collaborator; a failed transfer rolls the ledger back
//! before the distribution lock is released, so no intermediate state is
//! ever observable.

use std::sync::{Arc, Mutex};

use hongbao_core::{
    Address, ClaimKey, DistributionId, EntropySource, Hash32, ProofVerifier, TokenLedger, ZkProof,
};
use hongbao_merkle::{account_leaf, balance_leaf, keccak256, verify};
use tracing::{info, warn};

use crate::allocator::RedPacketAllocator;
use crate::distribution::{CreateRequest, Distribution};
use crate::events::{EngineEvent, EventLog};
use crate::expiry;
use crate::ledger::ClaimRecord;
use crate::store::DistributionStore;
use crate::EngineError;

/// Engine-wide configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Floor payout per packet, enforced at creation time.
    pub minimum_unit_share: u128,
    /// Upper bound on packets per distribution.
    pub max_packet_count: u64,
    /// Account the escrowed funds are held under.
    pub escrow: Address,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minimum_unit_share: 1,
            max_packet_count: 255,
            escrow: [0u8; 20],
        }
    }
}

/// How a claimant proves membership in the eligibility set.
#[derive(Debug, Clone, Copy)]
pub enum ClaimEntry {
    /// Red-packet free-claim mode: the leaf is `keccak256(claimant)` and the
    /// payout is computed by the allocator.
    Account,
    /// Indexed distributor mode: the leaf commits to
    /// `(index, claimant, amount)` and the payout is the committed amount.
    Indexed { index: u64, amount: u128 },
}

#[derive(Debug, Clone)]
pub struct ClaimRequest {
    pub distribution_id: DistributionId,
    pub claimant: Address,
    pub entry: ClaimEntry,
    pub proof: Vec<Hash32>,
    /// Required when the distribution is password-gated.
    pub zk_proof: Option<ZkProof>,
}

/// The claim-eligibility and allocation engine.
pub struct DistributionEngine {
    config: EngineConfig,
    allocator: RedPacketAllocator,
    store: DistributionStore,
    tokens: Arc<dyn TokenLedger + Send + Sync>,
    verifier: Arc<dyn ProofVerifier + Send + Sync>,
    entropy: Mutex<Box<dyn EntropySource + Send>>,
    events: EventLog,
}

impl DistributionEngine {
    pub fn new(
        config: EngineConfig,
        tokens: Arc<dyn TokenLedger + Send + Sync>,
        verifier: Arc<dyn ProofVerifier + Send + Sync>,
        entropy: Box<dyn EntropySource + Send>,
    ) -> Self {
        let allocator = RedPacketAllocator::new(config.minimum_unit_share);
        Self {
            config,
            allocator,
            store: DistributionStore::new(),
            tokens,
            verifier,
            entropy: Mutex::new(entropy),
            events: EventLog::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn store(&self) -> &DistributionStore {
        &self.store
    }

    /// Content-derived distribution id: `keccak256(creator || message)`.
    pub fn distribution_id(creator: &Address, message: &str) -> DistributionId {
        let mut data = Vec::with_capacity(20 + message.len());
        data.extend_from_slice(creator);
        data.extend_from_slice(message.as_bytes());
        keccak256(&data)
    }

    /// Register a distribution and pull the escrowed total from the creator.
    pub fn create_distribution(
        &self,
        req: CreateRequest,
        now: u64,
    ) -> Result<DistributionId, EngineError> {
        if req.packet_count == 0 {
            return Err(EngineError::ZeroPacketCount);
        }
        if req.packet_count > self.config.max_packet_count {
            return Err(EngineError::TooManyPackets {
                count: req.packet_count,
                max: self.config.max_packet_count,
            });
        }
        self.allocator
            .validate_creation(req.total_amount, req.packet_count)?;

        let id = Self::distribution_id(&req.creator, &req.message);
        let event = EngineEvent::CreationSuccess {
            id,
            total: req.total_amount,
            name: req.name.clone(),
            message: req.message.clone(),
            creator: req.creator,
            creation_time: now,
            token_address: req.token_address,
            number: req.packet_count,
            if_random: req.is_random_split,
            duration: req.duration,
        };
        let creator = req.creator;
        let total = req.total_amount;
        let packets = req.packet_count;

        self.store.insert(Distribution::new(id, req, now))?;

        if let Err(e) = self.tokens.transfer_from(creator, self.config.escrow, total) {
            self.store.remove(&id);
            return Err(e.into());
        }

        info!(
            id = %hex::encode(id),
            total,
            packets,
            "distribution created"
        );
        self.events.emit(event);
        Ok(id)
    }

    /// Verify a claim, allocate its payout, record it, and pay it out.
    pub fn claim(&self, req: ClaimRequest, now: u64) -> Result<u128, EngineError> {
        let handle = self.store.get(&req.distribution_id)?;
        let mut dist = handle.lock().expect("distribution lock poisoned");

        expiry::check_claim_window(&dist, now)?;

        let (key, leaf) = match req.entry {
            ClaimEntry::Account => (ClaimKey::Account(req.claimant), account_leaf(&req.claimant)),
            ClaimEntry::Indexed { index, amount } => (
                ClaimKey::Index(index),
                balance_leaf(index, &req.claimant, amount),
            ),
        };

        if dist.ledger.is_claimed(&key) {
            return Err(EngineError::AlreadyClaimed);
        }

        if !verify(&leaf, &req.proof, &dist.merkle_root) {
            return Err(EngineError::InvalidProof);
        }

        if dist.is_password_gated() {
            let verified = req
                .zk_proof
                .as_ref()
                .is_some_and(|p| self.verifier.verify_proof(p, &[dist.hash_lock]));
            if !verified {
                return Err(EngineError::ProofVerificationFailed);
            }
        }

        let (remaining_amount, remaining_packets) = dist.ledger.remaining();
        let payout = match req.entry {
            ClaimEntry::Indexed { amount, .. } => {
                if amount > remaining_amount {
                    return Err(EngineError::OutOfStock);
                }
                amount
            }
            ClaimEntry::Account => {
                let mut entropy = self.entropy.lock().expect("entropy lock poisoned");
                self.allocator.compute_share(
                    remaining_amount,
                    remaining_packets,
                    dist.is_random_split,
                    &mut **entropy,
                )
            }
        };

        dist.ledger.mark_claimed(key, payout, now)?;

        if let Err(e) = self.tokens.transfer(req.claimant, payout) {
            dist.ledger.rollback(&key);
            warn!(
                id = %hex::encode(dist.id),
                error = %e,
                "claim transfer failed, ledger rolled back"
            );
            return Err(e.into());
        }

        info!(
            id = %hex::encode(dist.id),
            claimer = %hex::encode(req.claimant),
            payout,
            "claim paid"
        );
        self.events.emit(EngineEvent::ClaimSuccess {
            id: dist.id,
            claimer: req.claimant,
            claimed_value: payout,
            token_address: dist.token_address,
            hash_lock: dist.hash_lock,
        });
        Ok(payout)
    }

    /// Return the remaining pool to the creator after expiry.
    pub fn refund(
        &self,
        distribution_id: &DistributionId,
        caller: &Address,
        now: u64,
    ) -> Result<u128, EngineError> {
        let handle = self.store.get(distribution_id)?;
        let mut dist = handle.lock().expect("distribution lock poisoned");

        expiry::check_refundable(&dist, caller, now)?;

        let remaining = dist.ledger.drain();
        dist.refunded = true;

        if let Err(e) = self.tokens.transfer(dist.creator, remaining) {
            dist.ledger.restore(remaining);
            dist.refunded = false;
            warn!(
                id = %hex::encode(dist.id),
                error = %e,
                "refund transfer failed, ledger rolled back"
            );
            return Err(e.into());
        }

        info!(
            id = %hex::encode(dist.id),
            remaining,
            "distribution refunded"
        );
        self.events.emit(EngineEvent::RefundSuccess {
            id: dist.id,
            token_address: dist.token_address,
            remaining_balance: remaining,
        });
        Ok(remaining)
    }

    /// Remaining `(amount, packets)` for a distribution.
    pub fn remaining(&self, id: &DistributionId) -> Result<(u128, u64), EngineError> {
        let handle = self.store.get(id)?;
        let dist = handle.lock().expect("distribution lock poisoned");
        Ok(dist.ledger.remaining())
    }

    pub fn is_claimed(&self, id: &DistributionId, key: &ClaimKey) -> Result<bool, EngineError> {
        let handle = self.store.get(id)?;
        let dist = handle.lock().expect("distribution lock poisoned");
        Ok(dist.ledger.is_claimed(key))
    }

    pub fn claim_record(
        &self,
        id: &DistributionId,
        key: &ClaimKey,
    ) -> Result<Option<ClaimRecord>, EngineError> {
        let handle = self.store.get(id)?;
        let dist = handle.lock().expect("distribution lock poisoned");
        Ok(dist.ledger.record(key).copied())
    }

    /// Point-in-time copy of a distribution's full state.
    pub fn snapshot(&self, id: &DistributionId) -> Result<Distribution, EngineError> {
        let handle = self.store.get(id)?;
        let dist = handle.lock().expect("distribution lock poisoned");
        Ok(dist.clone())
    }
}
