//! MoveColumn command - reorder columns within a board

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::ordering::rebalance::RebalanceTarget;
use crate::ordering::{allocate_between, Sibling};
use crate::store::Store;
use crate::types::{ActorId, ColumnId};
use serde::Deserialize;
use serde_json::Value;

/// Reorder a column relative to its siblings on the same board. Columns
/// never move across boards; the tasks keep their column and positions.
#[derive(Debug, Deserialize)]
pub struct MoveColumn {
    pub id: ColumnId,
    #[serde(default)]
    pub before: Option<ColumnId>,
    #[serde(default)]
    pub after: Option<ColumnId>,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl MoveColumn {
    /// Move a column to the end of its board
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            before: None,
            after: None,
            actor: None,
        }
    }

    /// Insert directly before the given sibling
    pub fn before(mut self, sibling: impl Into<ColumnId>) -> Self {
        self.before = Some(sibling.into());
        self
    }

    /// Insert directly after the given sibling
    pub fn after(mut self, sibling: impl Into<ColumnId>) -> Self {
        self.after = Some(sibling.into());
        self
    }

    /// Attribute the move to an actor
    pub fn by(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for MoveColumn {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let column = ctx.store().column(&self.id).await?;
        let board_id = column.board_id.clone();

        let siblings: Vec<Sibling> = ctx
            .store()
            .columns_in_board(&board_id)
            .await?
            .iter()
            .map(|c| Sibling::new(c.id.to_string(), c.position.clone()))
            .collect();
        let position = allocate_between(
            &siblings,
            self.id.as_str(),
            self.before.as_ref().map(|id| id.as_str()),
            self.after.as_ref().map(|id| id.as_str()),
        )?;
        let grew_too_long = position.needs_rebalance();

        let updated = ctx
            .store()
            .update_column(&self.id, {
                let position = position.clone();
                Box::new(move |c| {
                    c.position = position;
                    c.touch();
                })
            })
            .await?;

        if grew_too_long {
            ctx.enqueue_rebalance(RebalanceTarget::ColumnsInBoard {
                board_id: board_id.clone(),
            });
        }

        ctx.events().emit(DomainEvent::ColumnMoved {
            column: updated.clone(),
            actor: self.actor.clone(),
        });

        Ok(serde_json::to_value(&updated)?)
    }
}
