//! Task: an ordered item within a column

use super::ids::{BoardId, ColumnId, TaskId};
use super::position::PositionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task/card on a kanban board.
///
/// The owning container is the column; the owning top-level aggregate is the
/// board. `revision` increments on every positional or content mutation and
/// is a change-notification counter, not an optimistic-concurrency fence
/// (moves are last-write-wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub board_id: BoardId,
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Position key among siblings in the column
    pub position: PositionKey,
    /// Bumped on every positional or content mutation
    #[serde(default)]
    pub revision: u64,
    /// Soft-delete marker; archived tasks keep their position key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in the given column at the given position
    pub fn new(
        board_id: BoardId,
        column_id: ColumnId,
        title: impl Into<String>,
        position: PositionKey,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            board_id,
            column_id,
            title: title.into(),
            description: String::new(),
            position,
            revision: 0,
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this task is soft-deleted
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Record a mutation: bump the revision and refresh `updated_at`
    pub fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_starts_at_revision_zero() {
        let task = Task::new(
            BoardId::from_string("b1"),
            ColumnId::from_string("todo"),
            "Write spec",
            PositionKey::first(),
        );
        assert_eq!(task.revision, 0);
        assert!(!task.is_archived());
    }

    #[test]
    fn test_touch_bumps_revision() {
        let mut task = Task::new(
            BoardId::from_string("b1"),
            ColumnId::from_string("todo"),
            "Write spec",
            PositionKey::first(),
        );
        task.touch();
        task.touch();
        assert_eq!(task.revision, 2);
    }
}
