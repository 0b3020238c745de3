//! ArchiveColumn command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::store::Store;
use crate::types::{ActorId, ColumnId};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

/// Archive a column. The column and its tasks stay in the store; archived
/// columns keep their position keys and still participate in neighbour
/// lookups, so reordering around them stays collision free.
#[derive(Debug, Deserialize)]
pub struct ArchiveColumn {
    pub id: ColumnId,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl ArchiveColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
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
impl Execute<KanbanContext, KanbanError> for ArchiveColumn {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let updated = ctx
            .store()
            .update_column(
                &self.id,
                Box::new(|c| {
                    if c.archived_at.is_none() {
                        c.archived_at = Some(Utc::now());
                    }
                    c.touch();
                }),
            )
            .await?;

        ctx.events().emit(DomainEvent::ColumnArchived {
            column: updated.clone(),
            actor: self.actor.clone(),
        });

        Ok(serde_json::to_value(&updated)?)
    }
}
