//! GetTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::store::Store;
use crate::types::TaskId;
use serde::Deserialize;
use serde_json::Value;

/// Fetch a single task by id
#[derive(Debug, Deserialize)]
pub struct GetTask {
    pub id: TaskId,
}

impl GetTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetTask {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let task = ctx.store().task(&self.id).await?;
        Ok(serde_json::to_value(&task)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::AddTask;
    use crate::types::ColumnId;

    #[tokio::test]
    async fn test_get_task_round_trip() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());
        let added = AddTask::new(todo, "one").execute(&ctx).await.unwrap();

        let fetched = GetTask::new(added["id"].as_str().unwrap())
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(fetched["title"], "one");
        assert_eq!(fetched["position"], added["position"]);
    }

    #[tokio::test]
    async fn test_get_missing_task() {
        let ctx = KanbanContext::in_memory();
        let result = GetTask::new("ghost").execute(&ctx).await;
        assert!(matches!(result, Err(KanbanError::TaskNotFound { .. })));
    }
}
