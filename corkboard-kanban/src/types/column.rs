//! Column: a workflow stage, itself an ordered item within a board

use super::ids::{BoardId, ColumnId};
use super::position::PositionKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A column on a board. Columns are ordered within their board by the same
/// position-key scheme tasks use within columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub name: String,
    /// Position key among sibling columns of the board
    pub position: PositionKey,
    /// Bumped on every positional or content mutation
    #[serde(default)]
    pub revision: u64,
    /// Soft-delete marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Column {
    /// Create a new column on the given board at the given position
    pub fn new(board_id: BoardId, name: impl Into<String>, position: PositionKey) -> Self {
        Self {
            id: ColumnId::new(),
            board_id,
            name: name.into(),
            position,
            revision: 0,
            archived_at: None,
        }
    }

    /// Whether this column is soft-deleted
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Record a mutation: bump the revision
    pub fn touch(&mut self) {
        self.revision += 1;
    }
}
