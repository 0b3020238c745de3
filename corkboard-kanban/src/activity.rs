//! Activity log - an independent subscriber of the domain event bus
//!
//! Records one entry per domain event so "who did what, when" survives past
//! the broadcast. Decoupled from the command path: a move succeeds whether
//! or not anything is recording.

use crate::events::{DomainEvent, EventBus};
use crate::types::{ActivityEntryId, BoardId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// One recorded domain event
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: ActivityEntryId,
    pub timestamp: DateTime<Utc>,
    /// Event kind, e.g. "task.moved"
    pub kind: String,
    pub board_id: BoardId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

impl ActivityEntry {
    fn from_event(event: &DomainEvent) -> Self {
        Self {
            id: ActivityEntryId::new(),
            timestamp: Utc::now(),
            kind: event.kind().to_string(),
            board_id: event.board_id().clone(),
            entity_id: event.entity_id(),
            actor: event.actor().map(|a| a.to_string()),
        }
    }
}

/// Append-only activity record
#[derive(Default)]
pub struct ActivityLog {
    entries: Mutex<Vec<ActivityEntry>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event
    pub fn record(&self, event: &DomainEvent) {
        let entry = ActivityEntry::from_event(event);
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    /// Snapshot of all entries, oldest first
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Subscribe `log` to the bus on a background task. Lagging drops events
/// with a warning rather than slowing publishers down.
pub fn spawn_recorder(log: Arc<ActivityLog>, bus: &EventBus) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log.record(&event),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "activity recorder lagged, events not logged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
