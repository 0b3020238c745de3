//! Core types for the kanban engine

mod board;
mod column;
mod ids;
mod position;
mod task;

// Re-export all types
pub use board::Board;
pub use column::Column;
pub use ids::{ActivityEntryId, ActorId, BoardId, ColumnId, TaskId};
pub use position::{PositionKey, REBALANCE_THRESHOLD};
pub use task::Task;
