//! Rebalance engine - regenerates evenly spaced keys for a whole container
//!
//! Triggered by the move coordinator when a freshly allocated key crosses
//! the length threshold, never by clients. Runs on a dedicated worker task
//! so the triggering move's response path is never blocked by a
//! full-container rewrite. A failed pass is logged and dropped: the next
//! over-long key triggers it again, and in the meantime keys are merely
//! longer than ideal, never misordered.

use crate::error::Result;
use crate::events::{DomainEvent, EventBus};
use crate::store::Store;
use crate::types::{BoardId, ColumnId, PositionKey};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A container whose keys should be regenerated
#[derive(Debug, Clone)]
pub enum RebalanceTarget {
    /// The tasks of one column
    TasksInColumn {
        board_id: BoardId,
        column_id: ColumnId,
    },
    /// The column list of one board
    ColumnsInBoard { board_id: BoardId },
}

/// Rewrite every task key in the column with evenly spread short keys.
/// Order is preserved; archived tasks are respaced along with live ones.
/// Returns the number of rewritten items.
pub async fn rebalance_tasks(
    store: &dyn Store,
    bus: &EventBus,
    board_id: &BoardId,
    column_id: &ColumnId,
) -> Result<usize> {
    let tasks = store.tasks_in_column(column_id).await?;
    if tasks.is_empty() {
        return Ok(0);
    }
    let keys = PositionKey::spread(None, None, tasks.len())?;
    for (task, key) in tasks.iter().zip(keys) {
        store
            .update_task(
                &task.id,
                Box::new(move |t| {
                    t.position = key;
                    t.touch();
                }),
            )
            .await?;
    }
    bus.emit(DomainEvent::ContainerRebalanced {
        board_id: board_id.clone(),
        column_id: Some(column_id.clone()),
    });
    Ok(tasks.len())
}

/// Rewrite every column key on the board with evenly spread short keys.
pub async fn rebalance_columns(
    store: &dyn Store,
    bus: &EventBus,
    board_id: &BoardId,
) -> Result<usize> {
    let columns = store.columns_in_board(board_id).await?;
    if columns.is_empty() {
        return Ok(0);
    }
    let keys = PositionKey::spread(None, None, columns.len())?;
    for (column, key) in columns.iter().zip(keys) {
        store
            .update_column(
                &column.id,
                Box::new(move |c| {
                    c.position = key;
                    c.touch();
                }),
            )
            .await?;
    }
    bus.emit(DomainEvent::ContainerRebalanced {
        board_id: board_id.clone(),
        column_id: None,
    });
    Ok(columns.len())
}

/// Drain the rebalance queue until every sender is dropped. Failures are
/// logged and the pass abandoned; correctness does not depend on it.
pub async fn run_worker(
    store: Arc<dyn Store>,
    bus: EventBus,
    mut rx: mpsc::UnboundedReceiver<RebalanceTarget>,
) {
    while let Some(target) = rx.recv().await {
        let outcome = match &target {
            RebalanceTarget::TasksInColumn {
                board_id,
                column_id,
            } => rebalance_tasks(store.as_ref(), &bus, board_id, column_id).await,
            RebalanceTarget::ColumnsInBoard { board_id } => {
                rebalance_columns(store.as_ref(), &bus, board_id).await
            }
        };
        match outcome {
            Ok(count) => {
                tracing::debug!(?target, count, "rebalance pass complete");
            }
            Err(error) => {
                tracing::warn!(?target, %error, "rebalance pass failed, will retry on next trigger");
            }
        }
    }
}
