//! UpdateTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::store::Store;
use crate::types::{ActorId, TaskId};
use serde::Deserialize;
use serde_json::Value;

/// Update a task's content fields. Bumps the revision like any other
/// mutation, so subscribers can spot stale copies.
#[derive(Debug, Deserialize)]
pub struct UpdateTask {
    pub id: TaskId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl UpdateTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            actor: None,
        }
    }

    /// Set a new title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a new description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attribute the update to an actor
    pub fn by(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateTask {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let title = self.title.clone();
        let description = self.description.clone();
        let updated = ctx
            .store()
            .update_task(
                &self.id,
                Box::new(move |t| {
                    if let Some(title) = title {
                        t.title = title;
                    }
                    if let Some(description) = description {
                        t.description = description;
                    }
                    t.touch();
                }),
            )
            .await?;

        ctx.events().emit(DomainEvent::TaskUpdated {
            task: updated.clone(),
            actor: self.actor.clone(),
        });

        Ok(serde_json::to_value(&updated)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::AddTask;
    use crate::types::ColumnId;

    #[tokio::test]
    async fn test_update_bumps_revision() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());
        let added = AddTask::new(todo, "one").execute(&ctx).await.unwrap();

        let updated = UpdateTask::new(added["id"].as_str().unwrap())
            .with_title("renamed")
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(updated["title"], "renamed");
        assert_eq!(updated["revision"], 1);
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let ctx = KanbanContext::in_memory();
        let result = UpdateTask::new("ghost").with_title("x").execute(&ctx).await;
        assert!(matches!(result, Err(KanbanError::TaskNotFound { .. })));
    }
}
