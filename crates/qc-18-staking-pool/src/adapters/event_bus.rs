//! # Event Bus Adapters
//!
//! `BroadcastEventBus` fans events out to any number of subscribers using
//! `tokio::sync::broadcast`. Publishing never blocks and never fails the
//! caller: with no subscribers the event is dropped and logged.

use crate::config::PoolConfig;
use crate::events::EventEnvelope;
use crate::ports::outbound::EventPublisher;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default broadcast channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// In-process broadcast bus for pool events.
#[derive(Debug)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<EventEnvelope>,
    events_published: AtomicU64,
    capacity: usize,
}

impl BroadcastEventBus {
    /// Create a bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus sized by `config.event_channel_capacity`.
    #[must_use]
    pub fn from_config(config: &PoolConfig) -> Self {
        Self::with_capacity(config.event_channel_capacity)
    }

    /// Create a bus with the given channel capacity (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to all subsequent events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total publish attempts.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for BroadcastEventBus {
    fn publish(&self, envelope: EventEnvelope) -> usize {
        let name = envelope.event.name();
        let sequence = envelope.sequence;

        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(envelope) {
            Ok(receivers) => {
                debug!(event = name, sequence, receivers, "Event published");
                receivers
            }
            Err(_) => {
                warn!(event = name, sequence, "Event dropped (no receivers)");
                0
            }
        }
    }
}

/// Keeps every published event, in order.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<EventEnvelope>>,
}

impl RecordingEventPublisher {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event published so far.
    #[must_use]
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events.lock().clone()
    }
}

impl EventPublisher for RecordingEventPublisher {
    fn publish(&self, envelope: EventEnvelope) -> usize {
        self.events.lock().push(envelope);
        1
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PoolEvent;

    #[tokio::test]
    async fn test_publish_no_subscribers() {
        let bus = BroadcastEventBus::new();

        let receivers = bus.publish(EventEnvelope::new(1, PoolEvent::RewardsEnabled));
        assert_eq!(receivers, 0);
        assert_eq!(bus.events_published(), 1);
    }

    #[tokio::test]
    async fn test_publish_with_subscriber() {
        let bus = BroadcastEventBus::new();
        let mut rx = bus.subscribe();

        let envelope = EventEnvelope::new(1, PoolEvent::PoolReopened);
        assert_eq!(bus.publish(envelope.clone()), 1);
        assert_eq!(bus.subscriber_count(), 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, envelope);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = BroadcastEventBus::with_capacity(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(EventEnvelope::new(1, PoolEvent::RewardsEnabled));

        assert_eq!(rx1.recv().await.unwrap().sequence, 1);
        assert_eq!(rx2.recv().await.unwrap().sequence, 1);
        assert_eq!(bus.capacity(), 8);
    }

    #[test]
    fn test_capacity_from_config() {
        let config = PoolConfig {
            event_channel_capacity: 4,
            ..PoolConfig::default()
        };
        assert_eq!(BroadcastEventBus::from_config(&config).capacity(), 4);
        assert_eq!(
            BroadcastEventBus::new().capacity(),
            PoolConfig::default().event_channel_capacity
        );
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bus = BroadcastEventBus::with_capacity(0);
        assert_eq!(bus.capacity(), 1);
    }

    #[test]
    fn test_recorder_keeps_order() {
        let recorder = RecordingEventPublisher::new();
        recorder.publish(EventEnvelope::new(1, PoolEvent::RewardsEnabled));
        recorder.publish(EventEnvelope::new(2, PoolEvent::PoolReopened));

        let sequences: Vec<u64> = recorder.events().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
    }
}
