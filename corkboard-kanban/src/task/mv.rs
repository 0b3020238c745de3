//! MoveTask command - the move coordinator for tasks

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::ordering::rebalance::RebalanceTarget;
use crate::ordering::{allocate_between, cross, Sibling};
use crate::store::Store;
use crate::types::{ActorId, ColumnId, TaskId};
use serde::Deserialize;
use serde_json::Value;

/// Move a task within its column, to another column, or to another board's
/// column.
///
/// The positional reference is "insert before `before`" / "insert after
/// `after`"; with both absent the task appends at the end of the target
/// column. An anchor that cannot be resolved inside the target column is
/// treated as absent rather than failing the move. Moving a task onto its
/// current position still succeeds and still broadcasts - clients must not
/// assume "no visual change" means "no event".
#[derive(Debug, Deserialize)]
pub struct MoveTask {
    /// The task to move
    pub id: TaskId,
    /// Target column; absent = stay in the current column
    #[serde(default)]
    pub to_column: Option<ColumnId>,
    /// Insert directly before this sibling
    #[serde(default)]
    pub before: Option<TaskId>,
    /// Insert directly after this sibling
    #[serde(default)]
    pub after: Option<TaskId>,
    /// Who is moving it
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl MoveTask {
    /// Move a task to the end of its current column
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            to_column: None,
            before: None,
            after: None,
            actor: None,
        }
    }

    /// Set the target column
    pub fn to_column(mut self, column: impl Into<ColumnId>) -> Self {
        self.to_column = Some(column.into());
        self
    }

    /// Insert directly before the given sibling
    pub fn before(mut self, sibling: impl Into<TaskId>) -> Self {
        self.before = Some(sibling.into());
        self
    }

    /// Insert directly after the given sibling
    pub fn after(mut self, sibling: impl Into<TaskId>) -> Self {
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
impl Execute<KanbanContext, KanbanError> for MoveTask {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        // Item-not-found is fatal; anchor-not-found (below) is not.
        let task = ctx.store().task(&self.id).await?;
        let old_board_id = task.board_id.clone();
        let old_column_id = task.column_id.clone();

        let target_column_id = self
            .to_column
            .clone()
            .unwrap_or_else(|| task.column_id.clone());
        let target_column = ctx.store().column(&target_column_id).await?;
        let new_board_id = target_column.board_id.clone();

        let siblings: Vec<Sibling> = ctx
            .store()
            .tasks_in_column(&target_column_id)
            .await?
            .iter()
            .map(|t| Sibling::new(t.id.to_string(), t.position.clone()))
            .collect();
        let position = allocate_between(
            &siblings,
            self.id.as_str(),
            self.before.as_ref().map(|id| id.as_str()),
            self.after.as_ref().map(|id| id.as_str()),
        )?;
        let grew_too_long = position.needs_rebalance();

        // Container, key, and revision change in one atomic write.
        let updated = ctx
            .store()
            .update_task(&self.id, {
                let column_id = target_column_id.clone();
                let board_id = new_board_id.clone();
                let position = position.clone();
                Box::new(move |t| {
                    t.column_id = column_id;
                    t.board_id = board_id;
                    t.position = position;
                    t.touch();
                })
            })
            .await?;

        tracing::debug!(
            task_id = %self.id,
            from = %old_column_id,
            to = %target_column_id,
            position = %updated.position,
            "task moved"
        );

        // Decoupled from the response path: the caller never waits on a
        // full-container rewrite.
        if grew_too_long {
            ctx.enqueue_rebalance(RebalanceTarget::TasksInColumn {
                board_id: new_board_id,
                column_id: target_column_id,
            });
        }

        for event in cross::move_events(&updated, &old_board_id, &old_column_id, self.actor.clone())
        {
            ctx.events().emit(event);
        }

        Ok(serde_json::to_value(&updated)?)
    }
}
