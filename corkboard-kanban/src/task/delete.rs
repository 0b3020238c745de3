//! DeleteTask command - the true removal

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::store::Store;
use crate::types::{ActorId, TaskId};
use serde::Deserialize;
use serde_json::Value;

/// Permanently delete a task. Unlike archiving this removes the row; the
/// position key is retired with it and never reused.
#[derive(Debug, Deserialize)]
pub struct DeleteTask {
    pub id: TaskId,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            actor: None,
        }
    }

    /// Attribute the deletion to an actor
    pub fn by(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for DeleteTask {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let removed = ctx.store().remove_task(&self.id).await?;

        ctx.events().emit(DomainEvent::TaskDeleted {
            task_id: removed.id.clone(),
            board_id: removed.board_id.clone(),
            column_id: removed.column_id.clone(),
            actor: self.actor.clone(),
        });

        Ok(serde_json::to_value(&removed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::AddTask;
    use crate::types::ColumnId;

    #[tokio::test]
    async fn test_delete_removes_task() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());
        let added = AddTask::new(todo, "one").execute(&ctx).await.unwrap();
        let id = TaskId::from_string(added["id"].as_str().unwrap());

        DeleteTask::new(id.clone()).execute(&ctx).await.unwrap();
        let result = ctx.store().task(&id).await;
        assert!(matches!(result, Err(KanbanError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_emits_event_with_location() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());
        let added = AddTask::new(todo.clone(), "one").execute(&ctx).await.unwrap();

        let mut rx = ctx.events().subscribe();
        DeleteTask::new(added["id"].as_str().unwrap())
            .execute(&ctx)
            .await
            .unwrap();

        // Skip nothing: delete is the only emission on this subscription.
        match rx.recv().await.unwrap() {
            DomainEvent::TaskDeleted { column_id, .. } => assert_eq!(column_id, todo),
            other => panic!("expected TaskDeleted, got {}", other.kind()),
        }
    }
}
