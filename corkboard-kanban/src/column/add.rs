//! AddColumn command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::ordering::rebalance::RebalanceTarget;
use crate::ordering::{allocate_between, Sibling};
use crate::store::Store;
use crate::types::{ActorId, BoardId, Column, ColumnId};
use serde::Deserialize;
use serde_json::Value;

/// Add a column to a board. Without anchors the column appends at the end;
/// `before`/`after` place it relative to an existing column, and an anchor
/// that cannot be resolved degrades to an append.
#[derive(Debug, Deserialize)]
pub struct AddColumn {
    pub board_id: BoardId,
    pub name: String,
    #[serde(default)]
    pub before: Option<ColumnId>,
    #[serde(default)]
    pub after: Option<ColumnId>,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl AddColumn {
    pub fn new(board_id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            name: name.into(),
            before: None,
            after: None,
            actor: None,
        }
    }

    /// Insert directly before the given column
    pub fn before(mut self, sibling: impl Into<ColumnId>) -> Self {
        self.before = Some(sibling.into());
        self
    }

    /// Insert directly after the given column
    pub fn after(mut self, sibling: impl Into<ColumnId>) -> Self {
        self.after = Some(sibling.into());
        self
    }

    /// Attribute the addition to an actor
    pub fn by(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddColumn {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        if self.name.trim().is_empty() {
            return Err(KanbanError::invalid_value("name", "must not be empty"));
        }
        // Board must exist before we hang a column off it.
        let board = ctx.store().board(&self.board_id).await?;

        let siblings: Vec<Sibling> = ctx
            .store()
            .columns_in_board(&board.id)
            .await?
            .iter()
            .map(|c| Sibling::new(c.id.to_string(), c.position.clone()))
            .collect();
        let position = allocate_between(
            &siblings,
            "",
            self.before.as_ref().map(|id| id.as_str()),
            self.after.as_ref().map(|id| id.as_str()),
        )?;

        let column = Column::new(board.id.clone(), self.name.clone(), position);
        ctx.store().put_column(column.clone()).await?;

        if column.position.needs_rebalance() {
            ctx.enqueue_rebalance(RebalanceTarget::ColumnsInBoard {
                board_id: board.id.clone(),
            });
        }

        ctx.events().emit(DomainEvent::ColumnCreated {
            column: column.clone(),
            actor: self.actor.clone(),
        });

        Ok(serde_json::to_value(&column)?)
    }
}
