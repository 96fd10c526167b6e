//! Append-only engine event log with channel fan-out to subscribers.
//!
//! The engine's only output channel besides return values. Downstream
//! consumers (the indexer) subscribe and replay; the core carries no
//! indexing logic itself.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use hongbao_core::{Address, DistributionId, Hash32};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    CreationSuccess {
        id: DistributionId,
        total: u128,
        name: String,
        message: String,
        creator: Address,
        creation_time: u64,
        token_address: Address,
        number: u64,
        if_random: bool,
        duration: u64,
    },
    ClaimSuccess {
        id: DistributionId,
        claimer: Address,
        claimed_value: u128,
        token_address: Address,
        hash_lock: Hash32,
    },
    RefundSuccess {
        id: DistributionId,
        token_address: Address,
        remaining_balance: u128,
    },
}

impl EngineEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreationSuccess { .. } => "CreationSuccess",
            Self::ClaimSuccess { .. } => "ClaimSuccess",
            Self::RefundSuccess { .. } => "RefundSuccess",
        }
    }

    pub fn distribution_id(&self) -> &DistributionId {
        match self {
            Self::CreationSuccess { id, .. }
            | Self::ClaimSuccess { id, .. }
            | Self::RefundSuccess { id, .. } => id,
        }
    }
}

/// Append-only event log.
///
/// Events are retained in order and fanned out to any live subscriber
/// channels; disconnected subscribers are dropped on the next emit.
pub struct EventLog {
    events: Mutex<Vec<EngineEvent>>,
    subscribers: Mutex<Vec<Sender<EngineEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn emit(&self, event: EngineEvent) {
        debug!(
            kind = event.kind(),
            id = %hex::encode(event.distribution_id()),
            "engine event"
        );
        {
            let mut subscribers = self.subscribers.lock().expect("event lock poisoned");
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
        self.events.lock().expect("event lock poisoned").push(event);
    }

    /// New subscription receiving every event emitted from now on.
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        let (tx, rx) = channel();
        self.subscribers
            .lock()
            .expect("event lock poisoned")
            .push(tx);
        rx
    }

    /// Copy of the full event history.
    pub fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.lock().expect("event lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("event lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refund_event(balance: u128) -> EngineEvent {
        EngineEvent::RefundSuccess {
            id: [1u8; 32],
            token_address: [2u8; 20],
            remaining_balance: balance,
        }
    }

    #[test]
    fn test_emit_appends_in_order() {
        let log = EventLog::new();
        log.emit(refund_event(1));
        log.emit(refund_event(2));
        let events = log.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], refund_event(1));
        assert_eq!(events[1], refund_event(2));
    }

    #[test]
    fn test_subscriber_receives_events() {
        let log = EventLog::new();
        let rx = log.subscribe();
        log.emit(refund_event(7));
        assert_eq!(rx.try_recv().unwrap(), refund_event(7));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let log = EventLog::new();
        let rx = log.subscribe();
        drop(rx);
        log.emit(refund_event(1));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_subscription_starts_at_subscribe_time() {
        let log = EventLog::new();
        log.emit(refund_event(1));
        let rx = log.subscribe();
        log.emit(refund_event(2));
        assert_eq!(rx.try_recv().unwrap(), refund_event(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(refund_event(0).kind(), "RefundSuccess");
    }
}
