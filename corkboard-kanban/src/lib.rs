//! Collaborative ordering and change propagation for a kanban backend
//!
//! This crate is the write path of a multi-user board: commands mutate
//! entities through a transactional [`store::Store`], place siblings with
//! fractional-index [`types::PositionKey`]s, and publish every committed
//! change on an in-process [`events::EventBus`] so realtime fan-out and
//! activity recording can follow along without coupling to the commands.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use corkboard_kanban::{KanbanContext, board::InitBoard, task::AddTask, Execute};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = KanbanContext::in_memory();
//! let board = InitBoard::new("My Project").execute(&ctx).await?;
//!
//! let todo = board["columns"][0]["id"].as_str().unwrap();
//! let result = AddTask::new(todo, "Implement feature X")
//!     .with_description("Add the new feature")
//!     .execute(&ctx).await?;
//!
//! println!("Created task: {}", result["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Ordering model
//!
//! Sibling order is a per-item string key, not an integer index. Inserting
//! between two items allocates a key between theirs and touches exactly one
//! row; keys that grow past [`types::REBALANCE_THRESHOLD`] queue their
//! container for an asynchronous respace. See [`types::PositionKey`] and
//! [`ordering`].

mod context;
mod error;
mod execute;
pub mod types;

pub mod events;
pub mod ordering;
pub mod store;

// Command modules
pub mod activity;
pub mod board;
pub mod column;
pub mod task;

pub use context::KanbanContext;
pub use error::{KanbanError, Result};
pub use events::{DomainEvent, EventBus};
pub use execute::{async_trait, Execute};

// Re-export commonly used types
pub use types::{
    ActorId, Board, BoardId, Column, ColumnId, PositionKey, Task, TaskId, REBALANCE_THRESHOLD,
};
