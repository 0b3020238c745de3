//! ArchiveTask command - the soft delete

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::store::Store;
use crate::types::{ActorId, TaskId};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

/// Archive a task. The task keeps its position key and stays in the store;
/// it just stops appearing in board views. Re-archiving keeps the original
/// archive timestamp.
#[derive(Debug, Deserialize)]
pub struct ArchiveTask {
    pub id: TaskId,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl ArchiveTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            actor: None,
        }
    }

    /// Attribute the archival to an actor
    pub fn by(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ArchiveTask {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let updated = ctx
            .store()
            .update_task(
                &self.id,
                Box::new(|t| {
                    if t.archived_at.is_none() {
                        t.archived_at = Some(Utc::now());
                    }
                    t.touch();
                }),
            )
            .await?;

        ctx.events().emit(DomainEvent::TaskArchived {
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
    async fn test_archive_keeps_position_key() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());
        let added = AddTask::new(todo, "one").execute(&ctx).await.unwrap();

        let archived = ArchiveTask::new(added["id"].as_str().unwrap())
            .execute(&ctx)
            .await
            .unwrap();
        assert!(archived["archived_at"].is_string());
        assert_eq!(archived["position"], added["position"]);
    }

    #[tokio::test]
    async fn test_archive_twice_keeps_first_timestamp() {
        let ctx = KanbanContext::in_memory();
        let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
        let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());
        let added = AddTask::new(todo, "one").execute(&ctx).await.unwrap();
        let id = added["id"].as_str().unwrap();

        let first = ArchiveTask::new(id).execute(&ctx).await.unwrap();
        let second = ArchiveTask::new(id).execute(&ctx).await.unwrap();
        assert_eq!(first["archived_at"], second["archived_at"]);
    }
}
