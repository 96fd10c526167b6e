//! Hongbao Indexer
//!
//! Downstream consumer of engine events. Projects `CreationSuccess`,
//! `ClaimSuccess`, and `RefundSuccess` into `Redpacket`, `Claim`, and
//! `Refund` records with a running `remain_to_claim` counter. Lives outside
//! the engine so the core stays free of indexing logic.

use std::collections::HashMap;
use std::sync::mpsc::Receiver;

use hongbao_core::{Address, DistributionId, Hash32};
use hongbao_engine::EngineEvent;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One distribution as seen through its event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedpacketRecord {
    pub id: DistributionId,
    pub name: String,
    pub message: String,
    pub creator: Address,
    pub creation_time: u64,
    pub token_address: Address,
    pub total: u128,
    pub number: u64,
    pub remain_to_claim: u64,
    pub if_random: bool,
    pub duration: u64,
    pub expire_timestamp: u64,
    pub refunded: bool,
    pub all_claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRow {
    pub redpacket: DistributionId,
    pub claimer: Address,
    pub claimed_value: u128,
    pub token_address: Address,
    pub hash_lock: Hash32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRow {
    pub redpacket: DistributionId,
    pub token_address: Address,
    pub remaining_balance: u128,
}

/// In-memory projection of an engine event stream.
#[derive(Default)]
pub struct Indexer {
    redpackets: HashMap<DistributionId, RedpacketRecord>,
    claims: Vec<ClaimRow>,
    refunds: Vec<RefundRow>,
}

impl Indexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event to the projection.
    ///
    /// Claim and refund events for an unknown distribution still append
    /// their rows but skip the counter update.
    pub fn apply(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::CreationSuccess {
                id,
                total,
                name,
                message,
                creator,
                creation_time,
                token_address,
                number,
                if_random,
                duration,
            } => {
                self.redpackets.insert(
                    *id,
                    RedpacketRecord {
                        id: *id,
                        name: name.clone(),
                        message: message.clone(),
                        creator: *creator,
                        creation_time: *creation_time,
                        token_address: *token_address,
                        total: *total,
                        number: *number,
                        remain_to_claim: *number,
                        if_random: *if_random,
                        duration: *duration,
                        expire_timestamp: creation_time.saturating_add(*duration),
                        refunded: false,
                        all_claimed: false,
                    },
                );
            }
            EngineEvent::ClaimSuccess {
                id,
                claimer,
                claimed_value,
                token_address,
                hash_lock,
            } => {
                self.claims.push(ClaimRow {
                    redpacket: *id,
                    claimer: *claimer,
                    claimed_value: *claimed_value,
                    token_address: *token_address,
                    hash_lock: *hash_lock,
                });
                let Some(redpacket) = self.redpackets.get_mut(id) else {
                    warn!(id = %hex::encode(id), "claim for unknown redpacket");
                    return;
                };
                redpacket.remain_to_claim = redpacket.remain_to_claim.saturating_sub(1);
                if redpacket.remain_to_claim == 0 {
                    redpacket.all_claimed = true;
                }
            }
            EngineEvent::RefundSuccess {
                id,
                token_address,
                remaining_balance,
            } => {
                self.refunds.push(RefundRow {
                    redpacket: *id,
                    token_address: *token_address,
                    remaining_balance: *remaining_balance,
                });
                let Some(redpacket) = self.redpackets.get_mut(id) else {
                    warn!(id = %hex::encode(id), "refund for unknown redpacket");
                    return;
                };
                redpacket.refunded = true;
            }
        }
    }

    /// Apply every event currently queued on a subscription. Returns the
    /// number applied.
    pub fn drain(&mut self, rx: &Receiver<EngineEvent>) -> usize {
        let mut applied = 0;
        while let Ok(event) = rx.try_recv() {
            self.apply(&event);
            applied += 1;
        }
        applied
    }

    pub fn redpacket(&self, id: &DistributionId) -> Option<&RedpacketRecord> {
        self.redpackets.get(id)
    }

    pub fn redpacket_count(&self) -> usize {
        self.redpackets.len()
    }

    pub fn claims(&self) -> &[ClaimRow] {
        &self.claims
    }

    pub fn claims_for<'a>(
        &'a self,
        id: &'a DistributionId,
    ) -> impl Iterator<Item = &'a ClaimRow> {
        self.claims.iter().filter(move |c| &c.redpacket == id)
    }

    pub fn refunds(&self) -> &[RefundRow] {
        &self.refunds
    }
}
