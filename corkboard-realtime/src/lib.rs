//! Realtime fan-out for the kanban core
//!
//! Sits between the in-process domain event bus and whatever transport
//! carries events to clients (websocket handlers hold the subscriber ends).
//! Three pieces:
//!
//! - [`publisher::BroadcastPublisher`]: topic-keyed registry of subscriber
//!   sinks with best-effort, non-blocking delivery
//! - [`presence::PresenceTracker`]: who is viewing which board, with
//!   reference-counted connections, idle eviction, and throttled
//!   membership broadcasts
//! - [`bridge`]: the background task translating domain events to the
//!   client-facing wire vocabulary
//!
//! ```rust,no_run
//! use corkboard_kanban::KanbanContext;
//! use corkboard_realtime::{bridge, BroadcastPublisher, PresenceTracker};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let ctx = KanbanContext::in_memory();
//! let publisher = Arc::new(BroadcastPublisher::new());
//! let presence = PresenceTracker::new(Arc::clone(&publisher));
//!
//! bridge::spawn(ctx.events(), Arc::clone(&publisher));
//! presence.spawn_janitor();
//!
//! // A websocket handler would do, per connection:
//! let (sink, mut incoming) = publisher.subscribe("board:abc");
//! presence.join("board:abc", "alice");
//! # }
//! ```

pub mod bridge;
pub mod presence;
pub mod publisher;
pub mod wire;

pub use presence::{PresenceConfig, PresenceTracker};
pub use publisher::{BroadcastPublisher, SinkId};
pub use wire::WireEvent;
