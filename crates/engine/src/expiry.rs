//! Expiry clock and refund policy.
//!
//! Time is a logical clock: callers pass `now` explicitly and nothing here
//! schedules callbacks. Per distribution the state machine is
//! `Active -> {AllClaimed | Expired} -> Refunded`.

use hongbao_core::Address;

use crate::distribution::Distribution;
use crate::EngineError;

/// Absolute end of the claim window.
pub fn expire_timestamp(creation_time: u64, duration: u64) -> u64 {
    creation_time.saturating_add(duration)
}

/// Reject claims outside the active window.
///
/// Refunded and past-expiry distributions reject with `Expired`; an
/// exhausted pool rejects with `OutOfStock`.
pub fn check_claim_window(dist: &Distribution, now: u64) -> Result<(), EngineError> {
    if dist.refunded || now >= dist.expire_timestamp() {
        return Err(EngineError::Expired);
    }
    if dist.ledger.all_claimed() {
        return Err(EngineError::OutOfStock);
    }
    Ok(())
}

/// Refund preconditions: creator only, after expiry, at most once, and only
/// while something remains in the pool.
pub fn check_refundable(
    dist: &Distribution,
    caller: &Address,
    now: u64,
) -> Result<(), EngineError> {
    if caller != &dist.creator {
        return Err(EngineError::Unauthorized);
    }
    if dist.refunded {
        return Err(EngineError::AlreadyRefunded);
    }
    let expires = dist.expire_timestamp();
    if now < expires {
        return Err(EngineError::NotYetExpired { now, expires });
    }
    let (remaining, _) = dist.ledger.remaining();
    if remaining == 0 {
        return Err(EngineError::NothingToRefund);
    }
    Ok(())
}
