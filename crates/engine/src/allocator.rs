//! Payout allocation: even split and random split over the remaining pool.

use hongbao_core::EntropySource;

use crate::EngineError;

/// Computes each claimant's payout from the distribution's remaining state.
///
/// Guarantees across any full claim sequence: no claimant receives zero, the
/// payouts sum to the total exactly (the final packet takes the remainder),
/// and every intermediate payout leaves at least `minimum_unit_share` for
/// each claimant still to come.
#[derive(Debug, Clone)]
pub struct RedPacketAllocator {
    minimum_unit_share: u128,
}

impl RedPacketAllocator {
    pub fn new(minimum_unit_share: u128) -> Self {
        Self {
            minimum_unit_share: minimum_unit_share.max(1),
        }
    }

    pub fn minimum_unit_share(&self) -> u128 {
        self.minimum_unit_share
    }

    /// Creation-time floor check: every packet must be able to pay at least
    /// the minimum unit share.
    pub fn validate_creation(
        &self,
        total_amount: u128,
        packet_count: u64,
    ) -> Result<(), EngineError> {
        let required = self.minimum_unit_share.saturating_mul(packet_count as u128);
        if total_amount < required {
            return Err(EngineError::InsufficientAmount {
                total: total_amount,
                required,
                packets: packet_count,
            });
        }
        Ok(())
    }

    /// Payout for the next claim given the remaining pool.
    ///
    /// The final packet always receives the exact remainder, never the
    /// random formula, so the shares sum to the total with no dust.
    pub fn compute_share(
        &self,
        remaining_amount: u128,
        remaining_packets: u64,
        random_split: bool,
        entropy: &mut dyn EntropySource,
    ) -> u128 {
        if remaining_packets <= 1 {
            return remaining_amount;
        }
        let packets = remaining_packets as u128;
        if !random_split {
            return remaining_amount / packets;
        }

        let upper = remaining_amount
            .saturating_mul(2)
            .div_ceil(packets)
            .max(1);
        let raw = 1 + entropy.next_random() % upper;

        let floor = self.minimum_unit_share;
        let cap = remaining_amount
            .saturating_sub(floor.saturating_mul(packets - 1))
            .max(1);
        raw.max(floor).min(cap)
    }
}
