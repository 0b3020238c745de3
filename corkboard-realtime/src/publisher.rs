//! Topic-keyed fan-out to subscriber sinks
//!
//! The registry lives in a concurrent map keyed by topic, so publishing to
//! one board never contends with another. Delivery is fire-and-forget over
//! bounded channels: a sink that cannot keep up loses events rather than
//! slowing everyone else down.

use crate::wire::WireEvent;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

/// Per-sink buffer. Small on purpose: a connection that falls this far
/// behind is better served by a refetch than a replay.
pub const DEFAULT_SINK_CAPACITY: usize = 64;

/// Handle identifying one subscription within its topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(u64);

struct Sink {
    id: SinkId,
    tx: mpsc::Sender<WireEvent>,
}

/// Fan-out registry: topic name to the sinks currently subscribed to it.
///
/// Subscribing to an unknown topic creates it; removing the last sink of a
/// topic frees its entry. Within one topic, events published from one task
/// arrive at every sink in publish order.
pub struct BroadcastPublisher {
    topics: DashMap<String, Vec<Sink>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl BroadcastPublisher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SINK_CAPACITY)
    }

    /// Registry whose sinks buffer up to `capacity` undelivered events
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: DashMap::new(),
            next_id: AtomicU64::new(0),
            capacity,
        }
    }

    /// Register a sink under `topic`. The returned receiver yields events
    /// published to the topic from this moment on.
    pub fn subscribe(&self, topic: &str) -> (SinkId, mpsc::Receiver<WireEvent>) {
        let id = SinkId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.capacity);
        self.topics
            .entry(topic.to_string())
            .or_default()
            .push(Sink { id, tx });
        (id, rx)
    }

    /// Deregister a sink. The last sink of a topic takes the topic's
    /// bookkeeping with it.
    pub fn unsubscribe(&self, topic: &str, id: SinkId) {
        if let Some(mut sinks) = self.topics.get_mut(topic) {
            sinks.retain(|s| s.id != id);
        }
        self.topics.remove_if(topic, |_, sinks| sinks.is_empty());
    }

    /// Push `event` to every sink currently subscribed to `topic`. Returns
    /// the number of sinks that accepted it.
    ///
    /// Never blocks. A sink with a full buffer skips this event; a sink
    /// whose receiver is gone is pruned on the spot.
    pub fn publish(&self, topic: &str, event: WireEvent) -> usize {
        let mut delivered = 0;
        if let Some(mut sinks) = self.topics.get_mut(topic) {
            sinks.retain(|sink| match sink.tx.try_send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(topic, kind = event.kind, "sink full, dropping event");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            });
        }
        self.topics.remove_if(topic, |_, sinks| sinks.is_empty());
        delivered
    }

    /// Number of sinks currently subscribed to `topic`
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map(|s| s.len()).unwrap_or(0)
    }

    /// Number of topics with at least one sink
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new()
    }
}
