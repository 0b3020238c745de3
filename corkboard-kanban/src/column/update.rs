//! UpdateColumn command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::execute::{async_trait, Execute};
use crate::events::DomainEvent;
use crate::store::Store;
use crate::types::{ActorId, ColumnId};
use serde::Deserialize;
use serde_json::Value;

/// Rename a column
#[derive(Debug, Deserialize)]
pub struct UpdateColumn {
    pub id: ColumnId,
    pub name: String,
    #[serde(default)]
    pub actor: Option<ActorId>,
}

impl UpdateColumn {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            actor: None,
        }
    }

    /// Attribute the rename to an actor
    pub fn by(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateColumn {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        if self.name.trim().is_empty() {
            return Err(KanbanError::invalid_value("name", "must not be empty"));
        }

        let name = self.name.clone();
        let updated = ctx
            .store()
            .update_column(
                &self.id,
                Box::new(move |c| {
                    c.name = name;
                    c.touch();
                }),
            )
            .await?;

        ctx.events().emit(DomainEvent::ColumnUpdated {
            column: updated.clone(),
            actor: self.actor.clone(),
        });

        Ok(serde_json::to_value(&updated)?)
    }
}
