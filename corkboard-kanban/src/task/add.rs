//! AddTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::ordering::rebalance::RebalanceTarget;
use crate::ordering::{allocate_between, Sibling};
use crate::store::Store;
use crate::types::{ActorId, ColumnId, Task, TaskId};
use serde::Deserialize;
use serde_json::Value;

/// Create a new task in a column.
///
/// Without anchors the task is placed at the end of the column; `before` /
/// `after` anchors place it explicitly, with the same fail-open resolution
/// moves use.
#[derive(Debug, Deserialize)]
pub struct AddTask {
    /// The column to create the task in
    pub column_id: ColumnId,
    /// The task title
    pub title: String,
    /// Detailed task description
    #[serde(default)]
    pub description: Option<String>,
    /// Insert directly before this sibling
    #[serde(default)]
    pub before: Option<TaskId>,
    /// Insert directly after this sibling
    #[serde(default)]
    pub after: Option<TaskId>,
    /// Who is creating it
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl AddTask {
    /// Create a new AddTask command
    pub fn new(column_id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            title: title.into(),
            description: None,
            before: None,
            after: None,
            actor: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
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

    /// Attribute the creation to an actor
    pub fn by(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddTask {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let column = ctx.store().column(&self.column_id).await?;

        let siblings: Vec<Sibling> = ctx
            .store()
            .tasks_in_column(&self.column_id)
            .await?
            .iter()
            .map(|t| Sibling::new(t.id.to_string(), t.position.clone()))
            .collect();
        let position = allocate_between(
            &siblings,
            "",
            self.before.as_ref().map(|id| id.as_str()),
            self.after.as_ref().map(|id| id.as_str()),
        )?;

        let mut task = Task::new(
            column.board_id.clone(),
            self.column_id.clone(),
            self.title.clone(),
            position,
        );
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        ctx.store().put_task(task.clone()).await?;

        if task.position.needs_rebalance() {
            ctx.enqueue_rebalance(RebalanceTarget::TasksInColumn {
                board_id: task.board_id.clone(),
                column_id: task.column_id.clone(),
            });
        }

        ctx.events().emit(DomainEvent::TaskCreated {
            task: task.clone(),
            actor: self.actor.clone(),
        });

        Ok(serde_json::to_value(&task)?)
    }
}
