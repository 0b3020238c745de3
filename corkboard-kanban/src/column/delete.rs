//! DeleteColumn command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::store::Store;
use crate::types::{ActorId, ColumnId};
use serde::Deserialize;
use serde_json::Value;

/// Permanently delete a column. Refused while any task, archived or not,
/// still lives in it; callers move or delete the tasks first.
#[derive(Debug, Deserialize)]
pub struct DeleteColumn {
    pub id: ColumnId,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl DeleteColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
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
impl Execute<KanbanContext, KanbanError> for DeleteColumn {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let tasks = ctx.store().tasks_in_column(&self.id).await?;
        if !tasks.is_empty() {
            return Err(KanbanError::ColumnNotEmpty {
                id: self.id.to_string(),
                count: tasks.len(),
            });
        }

        let removed = ctx.store().remove_column(&self.id).await?;

        ctx.events().emit(DomainEvent::ColumnDeleted {
            column_id: removed.id.clone(),
            board_id: removed.board_id.clone(),
            actor: self.actor.clone(),
        });

        Ok(serde_json::to_value(&removed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::{AddTask, ArchiveTask};
    use crate::types::BoardId;

    #[tokio::test]
    async fn test_delete_empty_column() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let board_id = BoardId::from_string(board["id"].as_str().unwrap());
        let doing = board["columns"][1]["id"].as_str().unwrap();

        DeleteColumn::new(doing).execute(&ctx).await.unwrap();

        let columns = ctx.store().columns_in_board(&board_id).await.unwrap();
        assert_eq!(columns.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_refused_while_tasks_remain() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let doing = ColumnId::from_string(board["columns"][1]["id"].as_str().unwrap());

        AddTask::new(doing.clone(), "wip").execute(&ctx).await.unwrap();

        let result = DeleteColumn::new(doing).execute(&ctx).await;
        assert!(matches!(
            result,
            Err(KanbanError::ColumnNotEmpty { count: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_archived_tasks_still_block_deletion() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let doing = ColumnId::from_string(board["columns"][1]["id"].as_str().unwrap());

        let added = AddTask::new(doing.clone(), "wip").execute(&ctx).await.unwrap();
        ArchiveTask::new(added["id"].as_str().unwrap())
            .execute(&ctx)
            .await
            .unwrap();

        let result = DeleteColumn::new(doing).execute(&ctx).await;
        assert!(matches!(result, Err(KanbanError::ColumnNotEmpty { .. })));
    }
}
