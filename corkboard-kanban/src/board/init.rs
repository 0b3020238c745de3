//! InitBoard command - create a board seeded with its default columns

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::store::Store;
use crate::types::{ActorId, Board, Column, PositionKey};
use serde::Deserialize;
use serde_json::Value;

/// Create a board with the standard To Do / Doing / Done columns, evenly
/// spaced so early reordering never nests keys.
#[derive(Debug, Deserialize)]
pub struct InitBoard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl InitBoard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            actor: None,
        }
    }

    /// Set the board description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attribute the creation to an actor
    pub fn by(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for InitBoard {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        if self.name.trim().is_empty() {
            return Err(KanbanError::invalid_value("name", "must not be empty"));
        }

        let mut board = Board::new(self.name.clone());
        if let Some(description) = &self.description {
            board = board.with_description(description.clone());
        }
        ctx.store().put_board(board.clone()).await?;

        let names = Board::default_column_names();
        let positions = PositionKey::spread(None, None, names.len())?;
        let mut columns = Vec::with_capacity(names.len());
        for (name, position) in names.iter().zip(positions) {
            let column = Column::new(board.id.clone(), *name, position);
            ctx.store().put_column(column.clone()).await?;
            columns.push(column);
        }

        tracing::info!(board_id = %board.id, name = %board.name, "board initialized");

        for column in &columns {
            ctx.events().emit(DomainEvent::ColumnCreated {
                column: column.clone(),
                actor: self.actor.clone(),
            });
        }

        let mut value = serde_json::to_value(&board)?;
        value["columns"] = serde_json::to_value(&columns)?;
        Ok(value)
    }
}
