//! Domain events and the in-process event bus
//!
//! Decouples "a move happened" from "who cares". Commands emit events after
//! persisting; independent subscribers (the activity log, the realtime
//! bridge) consume them from a `tokio::sync::broadcast` channel. Emission is
//! fire-and-forget: a slow subscriber lags and drops events rather than
//! blocking the publisher.

use crate::types::{ActorId, BoardId, Column, ColumnId, Task, TaskId};
use serde::Serialize;
use tokio::sync::broadcast;

/// Default bus capacity; tests can use something smaller.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Something that happened to the board, carrying full entity data.
///
/// Cross-board task moves deliberately produce two events instead of one
/// `TaskMoved`: subscribers of the old board's topic see the task disappear,
/// subscribers of the new board's topic see it appear with enough data to
/// render it on first receipt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    TaskCreated {
        task: Task,
        actor: Option<ActorId>,
    },
    TaskUpdated {
        task: Task,
        actor: Option<ActorId>,
    },
    /// Same-board move or reorder; container ids are equal for a
    /// same-column reorder
    TaskMoved {
        task: Task,
        old_column_id: ColumnId,
        new_column_id: ColumnId,
        actor: Option<ActorId>,
    },
    /// Cross-board move, as seen by the old board's subscribers
    TaskRemovedFromBoard {
        task: Task,
        board_id: BoardId,
        actor: Option<ActorId>,
    },
    /// Cross-board move, as seen by the new board's subscribers
    TaskCreatedOnBoard {
        task: Task,
        board_id: BoardId,
        actor: Option<ActorId>,
    },
    TaskArchived {
        task: Task,
        actor: Option<ActorId>,
    },
    TaskDeleted {
        task_id: TaskId,
        board_id: BoardId,
        column_id: ColumnId,
        actor: Option<ActorId>,
    },
    ColumnCreated {
        column: Column,
        actor: Option<ActorId>,
    },
    ColumnMoved {
        column: Column,
        actor: Option<ActorId>,
    },
    ColumnUpdated {
        column: Column,
        actor: Option<ActorId>,
    },
    ColumnArchived {
        column: Column,
        actor: Option<ActorId>,
    },
    ColumnDeleted {
        column_id: ColumnId,
        board_id: BoardId,
        actor: Option<ActorId>,
    },
    /// A container's keys were regenerated; clients refetch to pick up the
    /// new (shorter) keys. `column_id` is `None` when the board's column
    /// list itself was rebalanced.
    ContainerRebalanced {
        board_id: BoardId,
        column_id: Option<ColumnId>,
    },
}

impl DomainEvent {
    /// Short event name for logging and the activity log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "task.created",
            Self::TaskUpdated { .. } => "task.updated",
            Self::TaskMoved { .. } => "task.moved",
            Self::TaskRemovedFromBoard { .. } => "task.removed_from_board",
            Self::TaskCreatedOnBoard { .. } => "task.created_on_board",
            Self::TaskArchived { .. } => "task.archived",
            Self::TaskDeleted { .. } => "task.deleted",
            Self::ColumnCreated { .. } => "column.created",
            Self::ColumnMoved { .. } => "column.moved",
            Self::ColumnUpdated { .. } => "column.updated",
            Self::ColumnArchived { .. } => "column.archived",
            Self::ColumnDeleted { .. } => "column.deleted",
            Self::ContainerRebalanced { .. } => "container.rebalanced",
        }
    }

    /// The board whose subscribers this event concerns
    pub fn board_id(&self) -> &BoardId {
        match self {
            Self::TaskCreated { task, .. }
            | Self::TaskUpdated { task, .. }
            | Self::TaskMoved { task, .. }
            | Self::TaskArchived { task, .. } => &task.board_id,
            Self::TaskRemovedFromBoard { board_id, .. }
            | Self::TaskCreatedOnBoard { board_id, .. }
            | Self::TaskDeleted { board_id, .. }
            | Self::ColumnDeleted { board_id, .. }
            | Self::ContainerRebalanced { board_id, .. } => board_id,
            Self::ColumnCreated { column, .. }
            | Self::ColumnMoved { column, .. }
            | Self::ColumnUpdated { column, .. }
            | Self::ColumnArchived { column, .. } => &column.board_id,
        }
    }

    /// Id of the entity this event relates to, if it has one
    pub fn entity_id(&self) -> Option<String> {
        match self {
            Self::TaskCreated { task, .. }
            | Self::TaskUpdated { task, .. }
            | Self::TaskMoved { task, .. }
            | Self::TaskRemovedFromBoard { task, .. }
            | Self::TaskCreatedOnBoard { task, .. }
            | Self::TaskArchived { task, .. } => Some(task.id.to_string()),
            Self::TaskDeleted { task_id, .. } => Some(task_id.to_string()),
            Self::ColumnCreated { column, .. }
            | Self::ColumnMoved { column, .. }
            | Self::ColumnUpdated { column, .. }
            | Self::ColumnArchived { column, .. } => Some(column.id.to_string()),
            Self::ColumnDeleted { column_id, .. } => Some(column_id.to_string()),
            Self::ContainerRebalanced { .. } => None,
        }
    }

    /// The actor responsible, where one was supplied
    pub fn actor(&self) -> Option<&ActorId> {
        match self {
            Self::TaskCreated { actor, .. }
            | Self::TaskUpdated { actor, .. }
            | Self::TaskMoved { actor, .. }
            | Self::TaskRemovedFromBoard { actor, .. }
            | Self::TaskCreatedOnBoard { actor, .. }
            | Self::TaskArchived { actor, .. }
            | Self::TaskDeleted { actor, .. }
            | Self::ColumnCreated { actor, .. }
            | Self::ColumnMoved { actor, .. }
            | Self::ColumnUpdated { actor, .. }
            | Self::ColumnArchived { actor, .. }
            | Self::ColumnDeleted { actor, .. } => actor.as_ref(),
            Self::ContainerRebalanced { .. } => None,
        }
    }
}

/// Broadcast-based bus distributing domain events to multiple consumers.
///
/// Receivers that fall behind get a `Lagged` error and miss events - for
/// a real-time board, freshness matters more than completeness.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with the given buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers. Never blocks; with no
    /// subscribers the event is dropped.
    pub fn emit(&self, event: DomainEvent) {
        tracing::debug!(
            kind = event.kind(),
            board_id = %event.board_id(),
            subscribers = self.tx.receiver_count(),
            "domain event"
        );
        let _ = self.tx.send(event);
    }

    /// Subscribe; each subscriber gets an independent stream
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}
