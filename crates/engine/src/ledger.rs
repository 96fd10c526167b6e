//! Per-distribution idempotent claim tracking and remaining-pool accounting.

use std::collections::HashMap;

use hongbao_core::ClaimKey;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Record of one paid-out claim. Immutable once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub amount_paid: u128,
    pub timestamp: u64,
}

/// Tracks which claimants have been paid and what remains in the pool.
///
/// `sum(amount_paid) + remaining_amount == total_amount` at all times.
#[derive(Debug, Clone)]
pub struct ClaimLedger {
    remaining_amount: u128,
    remaining_packets: u64,
    all_claimed: bool,
    claims: HashMap<ClaimKey, ClaimRecord>,
}

impl ClaimLedger {
    pub fn new(total_amount: u128, packet_count: u64) -> Self {
        Self {
            remaining_amount: total_amount,
            remaining_packets: packet_count,
            all_claimed: false,
            claims: HashMap::new(),
        }
    }

    pub fn is_claimed(&self, key: &ClaimKey) -> bool {
        self.claims.contains_key(key)
    }

    pub fn record(&self, key: &ClaimKey) -> Option<&ClaimRecord> {
        self.claims.get(key)
    }

    /// Remaining `(amount, packets)`.
    pub fn remaining(&self) -> (u128, u64) {
        (self.remaining_amount, self.remaining_packets)
    }

    pub fn all_claimed(&self) -> bool {
        self.all_claimed
    }

    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    /// Record a paid claim, decrementing the remaining pool.
    ///
    /// Flips `all_claimed` when the last packet goes out.
    pub fn mark_claimed(
        &mut self,
        key: ClaimKey,
        amount: u128,
        now: u64,
    ) -> Result<(), EngineError> {
        if self.remaining_packets == 0 {
            return Err(EngineError::OutOfStock);
        }
        if self.claims.contains_key(&key) {
            return Err(EngineError::AlreadyClaimed);
        }
        if amount > self.remaining_amount {
            return Err(EngineError::OutOfStock);
        }

        self.remaining_amount -= amount;
        self.remaining_packets -= 1;
        if self.remaining_packets == 0 {
            self.all_claimed = true;
        }
        self.claims.insert(
            key,
            ClaimRecord {
                amount_paid: amount,
                timestamp: now,
            },
        );
        Ok(())
    }

    /// Undo a `mark_claimed` whose downstream token transfer failed.
    pub(crate) fn rollback(&mut self, key: &ClaimKey) {
        if let Some(record) = self.claims.remove(key) {
            self.remaining_amount += record.amount_paid;
            self.remaining_packets += 1;
            self.all_claimed = false;
        }
    }

    /// Empty the remaining pool for a refund; returns the drained amount.
    pub(crate) fn drain(&mut self) -> u128 {
        std::mem::take(&mut self.remaining_amount)
    }

    /// Undo a `drain` whose refund transfer failed.
    pub(crate) fn restore(&mut self, amount: u128) {
        self.remaining_amount = amount;
    }
}
