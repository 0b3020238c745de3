//! Bridge from the in-process event bus to the broadcast registry
//!
//! Runs as one background task per process: it subscribes to the domain
//! event bus, translates each event to the wire vocabulary, and pushes it
//! onto the board's topic. Commands never talk to the publisher directly.

use crate::publisher::BroadcastPublisher;
use crate::wire;
use corkboard_kanban::EventBus;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Start forwarding domain events to `publisher`. Runs until the event bus
/// is dropped.
pub fn spawn(events: &EventBus, publisher: Arc<BroadcastPublisher>) -> JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match wire::from_domain(&event) {
                    Ok(outgoing) => {
                        for (topic, wire_event) in outgoing {
                            publisher.publish(&topic, wire_event);
                        }
                    }
                    Err(err) => {
                        tracing::error!(kind = event.kind(), %err, "unserializable event")
                    }
                },
                Err(RecvError::Lagged(missed)) => {
                    // Stale realtime data is recoverable; clients refetch.
                    tracing::warn!(missed, "bridge fell behind the event bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{board_topic, TASK_CREATED};
    use corkboard_kanban::{
        BoardId, ColumnId, DomainEvent, EventBus, PositionKey, Task,
    };

    fn sample_task(board: &str) -> Task {
        Task::new(
            BoardId::from_string(board),
            ColumnId::from_string("todo"),
            "t",
            PositionKey::first(),
        )
    }

    #[tokio::test]
    async fn test_domain_event_reaches_topic_subscribers() {
        let bus = EventBus::new(32);
        let publisher = Arc::new(BroadcastPublisher::new());
        let _bridge = spawn(&bus, Arc::clone(&publisher));

        let topic = board_topic(&BoardId::from_string("b1"));
        let (_id, mut rx) = publisher.subscribe(&topic);

        bus.emit(DomainEvent::TaskCreated {
            task: sample_task("b1"),
            actor: None,
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, TASK_CREATED);
        assert_eq!(event.data["board_id"], "b1");
    }

    #[tokio::test]
    async fn test_events_stay_on_their_board_topic() {
        let bus = EventBus::new(32);
        let publisher = Arc::new(BroadcastPublisher::new());
        let _bridge = spawn(&bus, Arc::clone(&publisher));

        let (_a, mut rx_a) = publisher.subscribe(&board_topic(&BoardId::from_string("b1")));
        let (_b, mut rx_b) = publisher.subscribe(&board_topic(&BoardId::from_string("b2")));

        bus.emit(DomainEvent::TaskCreated {
            task: sample_task("b2"),
            actor: None,
        });

        let event = rx_b.recv().await.unwrap();
        assert_eq!(event.kind, TASK_CREATED);
        assert!(rx_a.try_recv().is_err());
    }
}
