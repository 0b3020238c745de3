//! GetBoard command - the assembled board view

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::store::Store;
use crate::types::BoardId;
use serde::Deserialize;
use serde_json::Value;

/// Fetch a board with its columns and tasks nested in display order.
/// Archived columns and tasks are filtered out of the view; they remain in
/// the store and in ordering computations.
#[derive(Debug, Deserialize)]
pub struct GetBoard {
    pub id: BoardId,
    /// Include archived columns and tasks in the view
    #[serde(default)]
    pub include_archived: bool,
}

impl GetBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            include_archived: false,
        }
    }

    /// Include archived columns and tasks
    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetBoard {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let board = ctx.store().board(&self.id).await?;
        let columns = ctx.store().columns_in_board(&board.id).await?;

        let mut column_views = Vec::with_capacity(columns.len());
        for column in columns {
            if column.is_archived() && !self.include_archived {
                continue;
            }
            let tasks: Vec<_> = ctx
                .store()
                .tasks_in_column(&column.id)
                .await?
                .into_iter()
                .filter(|t| self.include_archived || !t.is_archived())
                .collect();
            let mut view = serde_json::to_value(&column)?;
            view["tasks"] = serde_json::to_value(&tasks)?;
            column_views.push(view);
        }

        let mut value = serde_json::to_value(&board)?;
        value["columns"] = Value::Array(column_views);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::{AddTask, ArchiveTask};
    use crate::types::ColumnId;

    #[tokio::test]
    async fn test_view_nests_tasks_in_display_order() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let board_id = board["id"].as_str().unwrap();
        let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());

        AddTask::new(todo.clone(), "one").execute(&ctx).await.unwrap();
        AddTask::new(todo, "two").execute(&ctx).await.unwrap();

        let view = GetBoard::new(board_id).execute(&ctx).await.unwrap();
        let titles: Vec<&str> = view["columns"][0]["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_archived_tasks_leave_the_view_but_not_the_store() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let board_id = board["id"].as_str().unwrap();
        let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());

        let added = AddTask::new(todo.clone(), "done with this")
            .execute(&ctx)
            .await
            .unwrap();
        ArchiveTask::new(added["id"].as_str().unwrap())
            .execute(&ctx)
            .await
            .unwrap();

        let view = GetBoard::new(board_id).execute(&ctx).await.unwrap();
        assert!(view["columns"][0]["tasks"].as_array().unwrap().is_empty());

        let with_archived = GetBoard::new(board_id)
            .include_archived()
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(
            with_archived["columns"][0]["tasks"].as_array().unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_missing_board_is_not_found() {
        let ctx = KanbanContext::in_memory();
        let result = GetBoard::new("ghost").execute(&ctx).await;
        assert!(matches!(result, Err(KanbanError::BoardNotFound { .. })));
    }
}
