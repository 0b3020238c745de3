//! Who is looking at which board right now
//!
//! Presence is derived entirely from join/leave traffic and kept in memory;
//! on reconnect a client simply joins again. A user with several tabs open
//! holds one entry per topic with a connection count, so closing one tab
//! never makes them vanish for everyone else.
//!
//! Membership changes are broadcast as full snapshots, at most once per
//! topic per throttle window. Rapid join/leave churn collapses into one
//! broadcast carrying the final state, trading up to one window of lag for
//! not flooding the network.

use crate::publisher::BroadcastPublisher;
use crate::wire;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Timing knobs, overridable in tests
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    /// At most one membership broadcast per topic per window
    pub broadcast_window: Duration,
    /// Entries silent for longer than this are evicted by the janitor
    pub idle_timeout: Duration,
    /// How often the janitor sweeps
    pub janitor_interval: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            broadcast_window: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(60),
            janitor_interval: Duration::from_secs(10),
        }
    }
}

struct Member {
    connections: u32,
    last_active: Instant,
}

#[derive(Default)]
struct TopicPresence {
    members: HashMap<String, Member>,
    /// A broadcast is already scheduled; further changes ride along with it
    broadcast_pending: bool,
}

struct Inner {
    topics: DashMap<String, TopicPresence>,
    publisher: Arc<BroadcastPublisher>,
    config: PresenceConfig,
}

/// Reference-counted per-topic membership with throttled broadcasts.
///
/// `join`, `leave`, and `touch` never block the caller; the snapshot
/// broadcast runs on a scheduled task once per window.
#[derive(Clone)]
pub struct PresenceTracker {
    inner: Arc<Inner>,
}

impl PresenceTracker {
    pub fn new(publisher: Arc<BroadcastPublisher>) -> Self {
        Self::with_config(publisher, PresenceConfig::default())
    }

    pub fn with_config(publisher: Arc<BroadcastPublisher>, config: PresenceConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                topics: DashMap::new(),
                publisher,
                config,
            }),
        }
    }

    /// A connection of `user` arrived on `topic`. The first connection
    /// creates the entry and schedules a broadcast; repeats only bump the
    /// count and refresh the activity timestamp.
    pub fn join(&self, topic: &str, user: &str) {
        let changed = {
            let mut presence = self.inner.topics.entry(topic.to_string()).or_default();
            match presence.members.get_mut(user) {
                Some(member) => {
                    member.connections += 1;
                    member.last_active = Instant::now();
                    false
                }
                None => {
                    presence.members.insert(
                        user.to_string(),
                        Member {
                            connections: 1,
                            last_active: Instant::now(),
                        },
                    );
                    true
                }
            }
        };
        if changed {
            self.schedule_broadcast(topic);
        }
    }

    /// A connection of `user` on `topic` went away. The entry survives
    /// until its last connection leaves; only its removal is broadcast.
    pub fn leave(&self, topic: &str, user: &str) {
        let changed = {
            let Some(mut presence) = self.inner.topics.get_mut(topic) else {
                return;
            };
            match presence.members.get_mut(user) {
                Some(member) if member.connections > 1 => {
                    member.connections -= 1;
                    false
                }
                Some(_) => {
                    presence.members.remove(user);
                    true
                }
                None => false,
            }
        };
        if changed {
            self.schedule_broadcast(topic);
        }
    }

    /// Heartbeat: refresh the activity timestamp without touching the
    /// count. A heartbeat for an unknown entry counts as a join, covering
    /// the case where the janitor evicted a connection that is still alive.
    pub fn touch(&self, topic: &str, user: &str) {
        let known = {
            match self.inner.topics.get_mut(topic) {
                Some(mut presence) => match presence.members.get_mut(user) {
                    Some(member) => {
                        member.last_active = Instant::now();
                        true
                    }
                    None => false,
                },
                None => false,
            }
        };
        if !known {
            self.join(topic, user);
        }
    }

    /// Current members of `topic`, sorted for stable output
    pub fn membership(&self, topic: &str) -> Vec<String> {
        let mut members: Vec<String> = self
            .inner
            .topics
            .get(topic)
            .map(|p| p.members.keys().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// Run one janitor sweep: drop entries idle past the timeout, counted
    /// connections or not, and schedule one broadcast per changed topic.
    /// A connection that is merely quiet keeps itself alive with `touch`.
    pub fn sweep(&self) {
        let idle_timeout = self.inner.config.idle_timeout;
        let mut changed_topics = Vec::new();
        for mut entry in self.inner.topics.iter_mut() {
            let before = entry.members.len();
            entry
                .members
                .retain(|_, m| m.last_active.elapsed() <= idle_timeout);
            if entry.members.len() != before {
                changed_topics.push(entry.key().clone());
            }
        }
        for topic in changed_topics {
            self.schedule_broadcast(&topic);
        }
    }

    /// Sweep on a fixed interval until the tracker is dropped
    pub fn spawn_janitor(&self) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tracker.inner.config.janitor_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // First tick completes immediately; the sweep is harmless.
            loop {
                interval.tick().await;
                tracker.sweep();
            }
        })
    }

    /// Arrange a membership broadcast one window from now, unless one is
    /// already pending for this topic. Changes landing in the meantime are
    /// folded into the snapshot the timer takes when it fires.
    fn schedule_broadcast(&self, topic: &str) {
        {
            let Some(mut presence) = self.inner.topics.get_mut(topic) else {
                return;
            };
            if presence.broadcast_pending {
                return;
            }
            presence.broadcast_pending = true;
        }

        let inner = Arc::clone(&self.inner);
        let topic = topic.to_string();
        // Anchor the deadline here, not at the task's first poll: under a
        // paused test clock the spawned task may not run until after time
        // has already been advanced.
        let deadline = Instant::now() + self.inner.config.broadcast_window;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let members = {
                let Some(mut presence) = inner.topics.get_mut(&topic) else {
                    return;
                };
                presence.broadcast_pending = false;
                let mut members: Vec<String> = presence.members.keys().cloned().collect();
                members.sort();
                members
            };
            inner
                .topics
                .remove_if(&topic, |_, p| p.members.is_empty() && !p.broadcast_pending);
            inner.publisher.publish(&topic, wire::presence_event(&members));
        });
    }
}
