//! Wire format for events pushed to connected clients
//!
//! Every payload on the wire is `{ "type": ..., "data": ... }` where `type`
//! comes from a fixed vocabulary and `data` is the affected entity. Clients
//! switch on `type` and must ignore types they do not know.

use corkboard_kanban::{BoardId, DomainEvent};
use serde::Serialize;
use serde_json::{json, Value};

pub const TASK_CREATED: &str = "task:created";
pub const TASK_UPDATED: &str = "task:updated";
pub const TASK_MOVED: &str = "task:moved";
pub const TASK_ARCHIVED: &str = "task:archived";
pub const TASK_DELETED: &str = "task:deleted";
pub const COLUMN_CREATED: &str = "column:created";
pub const COLUMN_MOVED: &str = "column:moved";
pub const COLUMN_UPDATED: &str = "column:updated";
pub const COLUMN_DELETED: &str = "column:deleted";
pub const COLUMN_REBALANCED: &str = "column:rebalanced";
pub const BOARD_REBALANCED: &str = "board:rebalanced";
pub const PRESENCE_UPDATED: &str = "presence:updated";

/// One event as sent to a subscribed connection
#[derive(Debug, Clone, Serialize)]
pub struct WireEvent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Value,
}

impl WireEvent {
    pub fn new(kind: &'static str, data: Value) -> Self {
        Self { kind, data }
    }
}

/// The broadcast topic for a board's subscribers
pub fn board_topic(board_id: &BoardId) -> String {
    format!("board:{board_id}")
}

/// Map a domain event onto the wire vocabulary, paired with the topic it
/// belongs on.
///
/// The two halves of a cross-board move arrive here as separate events and
/// go out as an ordinary deletion on the old board's topic and an ordinary
/// creation on the new board's; subscribers of either board never see a
/// generic move. Archiving a column goes out as an update since clients
/// render it from `archived_at`.
pub fn from_domain(event: &DomainEvent) -> serde_json::Result<Vec<(String, WireEvent)>> {
    let topic = board_topic(event.board_id());
    let wire = match event {
        DomainEvent::TaskCreated { task, .. } => {
            WireEvent::new(TASK_CREATED, serde_json::to_value(task)?)
        }
        DomainEvent::TaskUpdated { task, .. } => {
            WireEvent::new(TASK_UPDATED, serde_json::to_value(task)?)
        }
        DomainEvent::TaskMoved {
            task,
            old_column_id,
            ..
        } => {
            let mut data = serde_json::to_value(task)?;
            data["old_column_id"] = json!(old_column_id);
            WireEvent::new(TASK_MOVED, data)
        }
        DomainEvent::TaskRemovedFromBoard { task, .. } => {
            WireEvent::new(TASK_DELETED, serde_json::to_value(task)?)
        }
        DomainEvent::TaskCreatedOnBoard { task, .. } => {
            WireEvent::new(TASK_CREATED, serde_json::to_value(task)?)
        }
        DomainEvent::TaskArchived { task, .. } => {
            WireEvent::new(TASK_ARCHIVED, serde_json::to_value(task)?)
        }
        DomainEvent::TaskDeleted {
            task_id, column_id, ..
        } => WireEvent::new(
            TASK_DELETED,
            json!({ "id": task_id, "column_id": column_id }),
        ),
        DomainEvent::ColumnCreated { column, .. } => {
            WireEvent::new(COLUMN_CREATED, serde_json::to_value(column)?)
        }
        DomainEvent::ColumnMoved { column, .. } => {
            WireEvent::new(COLUMN_MOVED, serde_json::to_value(column)?)
        }
        DomainEvent::ColumnUpdated { column, .. }
        | DomainEvent::ColumnArchived { column, .. } => {
            WireEvent::new(COLUMN_UPDATED, serde_json::to_value(column)?)
        }
        DomainEvent::ColumnDeleted { column_id, .. } => {
            WireEvent::new(COLUMN_DELETED, json!({ "id": column_id }))
        }
        DomainEvent::ContainerRebalanced {
            board_id,
            column_id,
        } => match column_id {
            Some(column_id) => WireEvent::new(
                COLUMN_REBALANCED,
                json!({ "board_id": board_id, "column_id": column_id }),
            ),
            None => WireEvent::new(BOARD_REBALANCED, json!({ "board_id": board_id })),
        },
    };
    Ok(vec![(topic, wire)])
}

/// The membership snapshot broadcast for a presence change
pub fn presence_event(members: &[String]) -> WireEvent {
    WireEvent::new(PRESENCE_UPDATED, json!(members))
}
