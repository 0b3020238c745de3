//! Cross-board move classification
//!
//! Broadcast topics are board-scoped, so a task move that changes the owning
//! board cannot be described by one "moved" event: nobody subscribed to both
//! topics would need it, and subscribers of either topic alone would get a
//! delta they cannot apply. Instead the old board's subscribers get a
//! removal and the new board's subscribers get a creation, each carrying the
//! full task so a client that has never seen it can render it immediately.

use crate::events::DomainEvent;
use crate::types::{ActorId, BoardId, ColumnId, Task};

/// Events describing a completed task move, given the pre-move location.
///
/// Same-board moves (including same-column reorders and no-op moves) yield
/// one [`DomainEvent::TaskMoved`]. Cross-board moves yield exactly
/// [`DomainEvent::TaskRemovedFromBoard`] for the old board followed by
/// [`DomainEvent::TaskCreatedOnBoard`] for the new one.
pub fn move_events(
    task: &Task,
    old_board_id: &BoardId,
    old_column_id: &ColumnId,
    actor: Option<ActorId>,
) -> Vec<DomainEvent> {
    if &task.board_id != old_board_id {
        vec![
            DomainEvent::TaskRemovedFromBoard {
                task: task.clone(),
                board_id: old_board_id.clone(),
                actor: actor.clone(),
            },
            DomainEvent::TaskCreatedOnBoard {
                task: task.clone(),
                board_id: task.board_id.clone(),
                actor,
            },
        ]
    } else {
        vec![DomainEvent::TaskMoved {
            task: task.clone(),
            old_column_id: old_column_id.clone(),
            new_column_id: task.column_id.clone(),
            actor,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PositionKey;

    fn task_on(board: &str, column: &str) -> Task {
        Task::new(
            BoardId::from_string(board),
            ColumnId::from_string(column),
            "t",
            PositionKey::first(),
        )
    }

    #[test]
    fn test_same_board_move_is_one_event() {
        let task = task_on("b1", "doing");
        let events = move_events(
            &task,
            &BoardId::from_string("b1"),
            &ColumnId::from_string("todo"),
            None,
        );
        assert_eq!(events.len(), 1);
        match &events[0] {
            DomainEvent::TaskMoved {
                old_column_id,
                new_column_id,
                ..
            } => {
                assert_eq!(old_column_id.as_str(), "todo");
                assert_eq!(new_column_id.as_str(), "doing");
            }
            other => panic!("expected TaskMoved, got {}", other.kind()),
        }
    }

    #[test]
    fn test_same_column_reorder_has_equal_container_ids() {
        let task = task_on("b1", "todo");
        let events = move_events(
            &task,
            &BoardId::from_string("b1"),
            &ColumnId::from_string("todo"),
            None,
        );
        match &events[0] {
            DomainEvent::TaskMoved {
                old_column_id,
                new_column_id,
                ..
            } => assert_eq!(old_column_id, new_column_id),
            other => panic!("expected TaskMoved, got {}", other.kind()),
        }
    }

    #[test]
    fn test_cross_board_move_is_removal_then_creation() {
        let task = task_on("b2", "inbox");
        let events = move_events(
            &task,
            &BoardId::from_string("b1"),
            &ColumnId::from_string("todo"),
            Some(ActorId::from_string("alice")),
        );
        assert_eq!(events.len(), 2);
        match &events[0] {
            DomainEvent::TaskRemovedFromBoard { board_id, task, .. } => {
                assert_eq!(board_id.as_str(), "b1");
                assert_eq!(task.board_id.as_str(), "b2");
            }
            other => panic!("expected TaskRemovedFromBoard, got {}", other.kind()),
        }
        match &events[1] {
            DomainEvent::TaskCreatedOnBoard { board_id, task, .. } => {
                assert_eq!(board_id.as_str(), "b2");
                assert_eq!(task.title, "t");
            }
            other => panic!("expected TaskCreatedOnBoard, got {}", other.kind()),
        }
    }
}
