//! Board: the top-level aggregate

use super::ids::BoardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board - just metadata. Columns and tasks are stored as individual
/// entities keyed by id; the board is the aggregate their broadcast topic is
/// scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Create a new board with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            description: None,
            created_at: Utc::now(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names for the columns every new board is seeded with
    pub fn default_column_names() -> [&'static str; 3] {
        ["To Do", "Doing", "Done"]
    }
}
