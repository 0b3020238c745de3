//! Storage abstraction - a transactional key-value store keyed by entity id
//!
//! The relational layer is an external collaborator; this trait is the
//! boundary. The one guarantee the ordering core needs from it is that a
//! read-modify-write of a single row is serializable, so two concurrent
//! moves of the same item cannot both observe the same starting state and
//! silently drop one outcome. [`MemoryStore`] satisfies that with per-entry
//! locking; a relational engine satisfies it with row-level locks.

use crate::error::{KanbanError, Result};
use crate::types::{Board, BoardId, Column, ColumnId, Task, TaskId};
use async_trait::async_trait;
use dashmap::DashMap;

/// A single-row mutation applied under the store's per-row lock
pub type Mutation<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Entity storage keyed by id, with atomic per-row read-modify-write
#[async_trait]
pub trait Store: Send + Sync {
    async fn put_board(&self, board: Board) -> Result<()>;
    async fn board(&self, id: &BoardId) -> Result<Board>;

    async fn put_column(&self, column: Column) -> Result<()>;
    async fn column(&self, id: &ColumnId) -> Result<Column>;
    /// Apply `mutate` to the column as one atomic read-modify-write
    async fn update_column(&self, id: &ColumnId, mutate: Mutation<Column>) -> Result<Column>;
    async fn remove_column(&self, id: &ColumnId) -> Result<Column>;
    /// All columns of a board (archived included), sorted by position key
    async fn columns_in_board(&self, board: &BoardId) -> Result<Vec<Column>>;

    async fn put_task(&self, task: Task) -> Result<()>;
    async fn task(&self, id: &TaskId) -> Result<Task>;
    /// Apply `mutate` to the task as one atomic read-modify-write
    async fn update_task(&self, id: &TaskId, mutate: Mutation<Task>) -> Result<Task>;
    async fn remove_task(&self, id: &TaskId) -> Result<Task>;
    /// All tasks of a column (archived included), sorted by position key
    async fn tasks_in_column(&self, column: &ColumnId) -> Result<Vec<Task>>;
}

/// In-memory store on concurrent maps. Entry locks serialize per-row
/// read-modify-write; unrelated entities never contend.
#[derive(Default)]
pub struct MemoryStore {
    boards: DashMap<BoardId, Board>,
    columns: DashMap<ColumnId, Column>,
    tasks: DashMap<TaskId, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put_board(&self, board: Board) -> Result<()> {
        self.boards.insert(board.id.clone(), board);
        Ok(())
    }

    async fn board(&self, id: &BoardId) -> Result<Board> {
        self.boards
            .get(id)
            .map(|b| b.clone())
            .ok_or_else(|| KanbanError::BoardNotFound { id: id.to_string() })
    }

    async fn put_column(&self, column: Column) -> Result<()> {
        self.columns.insert(column.id.clone(), column);
        Ok(())
    }

    async fn column(&self, id: &ColumnId) -> Result<Column> {
        self.columns
            .get(id)
            .map(|c| c.clone())
            .ok_or_else(|| KanbanError::ColumnNotFound { id: id.to_string() })
    }

    async fn update_column(&self, id: &ColumnId, mutate: Mutation<Column>) -> Result<Column> {
        let mut entry = self
            .columns
            .get_mut(id)
            .ok_or_else(|| KanbanError::ColumnNotFound { id: id.to_string() })?;
        mutate(entry.value_mut());
        Ok(entry.clone())
    }

    async fn remove_column(&self, id: &ColumnId) -> Result<Column> {
        self.columns
            .remove(id)
            .map(|(_, c)| c)
            .ok_or_else(|| KanbanError::ColumnNotFound { id: id.to_string() })
    }

    async fn columns_in_board(&self, board: &BoardId) -> Result<Vec<Column>> {
        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| &c.board_id == board)
            .map(|c| c.clone())
            .collect();
        columns.sort_by(|a, b| a.position.cmp(&b.position));
        Ok(columns)
    }

    async fn put_task(&self, task: Task) -> Result<()> {
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    async fn task(&self, id: &TaskId) -> Result<Task> {
        self.tasks
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| KanbanError::TaskNotFound { id: id.to_string() })
    }

    async fn update_task(&self, id: &TaskId, mutate: Mutation<Task>) -> Result<Task> {
        let mut entry = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| KanbanError::TaskNotFound { id: id.to_string() })?;
        mutate(entry.value_mut());
        Ok(entry.clone())
    }

    async fn remove_task(&self, id: &TaskId) -> Result<Task> {
        self.tasks
            .remove(id)
            .map(|(_, t)| t)
            .ok_or_else(|| KanbanError::TaskNotFound { id: id.to_string() })
    }

    async fn tasks_in_column(&self, column: &ColumnId) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| &t.column_id == column)
            .map(|t| t.clone())
            .collect();
        tasks.sort_by(|a, b| a.position.cmp(&b.position));
        Ok(tasks)
    }
}
