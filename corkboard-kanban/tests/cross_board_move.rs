//! A task dragged from one board to another must look like a removal to
//! the old board's subscribers and a creation to the new board's.

use corkboard_kanban::board::{GetBoard, InitBoard};
use corkboard_kanban::task::{AddTask, MoveTask};
use corkboard_kanban::{BoardId, ColumnId, DomainEvent, Execute, KanbanContext};

async fn init_board(ctx: &KanbanContext, name: &str) -> (BoardId, ColumnId) {
    let result = InitBoard::new(name).execute(ctx).await.unwrap();
    let board_id = BoardId::from_string(result["id"].as_str().unwrap());
    let todo = ColumnId::from_string(result["columns"][0]["id"].as_str().unwrap());
    (board_id, todo)
}

#[tokio::test]
async fn cross_board_move_splits_into_removal_and_creation() {
    let ctx = KanbanContext::in_memory();
    let (board_a, todo_a) = init_board(&ctx, "A").await;
    let (board_b, todo_b) = init_board(&ctx, "B").await;

    let added = AddTask::new(todo_a, "wandering task")
        .execute(&ctx)
        .await
        .unwrap();
    let task_id = added["id"].as_str().unwrap();

    let mut rx = ctx.events().subscribe();
    MoveTask::new(task_id)
        .to_column(todo_b)
        .by("alice")
        .execute(&ctx)
        .await
        .unwrap();

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();

    match &first {
        DomainEvent::TaskRemovedFromBoard { task, board_id, .. } => {
            assert_eq!(board_id, &board_a);
            // Full entity data, so old-board clients can show what left.
            assert_eq!(task.title, "wandering task");
        }
        other => panic!("expected TaskRemovedFromBoard, got {}", other.kind()),
    }
    match &second {
        DomainEvent::TaskCreatedOnBoard { task, board_id, .. } => {
            assert_eq!(board_id, &board_b);
            assert_eq!(task.board_id, board_b);
        }
        other => panic!("expected TaskCreatedOnBoard, got {}", other.kind()),
    }

    // No generic move anywhere in the stream.
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn cross_board_move_updates_both_board_views() {
    let ctx = KanbanContext::in_memory();
    let (board_a, todo_a) = init_board(&ctx, "A").await;
    let (board_b, todo_b) = init_board(&ctx, "B").await;

    let added = AddTask::new(todo_a, "wandering task")
        .execute(&ctx)
        .await
        .unwrap();
    MoveTask::new(added["id"].as_str().unwrap())
        .to_column(todo_b)
        .execute(&ctx)
        .await
        .unwrap();

    let view_a = GetBoard::new(board_a).execute(&ctx).await.unwrap();
    assert!(view_a["columns"][0]["tasks"].as_array().unwrap().is_empty());

    let view_b = GetBoard::new(board_b).execute(&ctx).await.unwrap();
    let tasks_b = view_b["columns"][0]["tasks"].as_array().unwrap();
    assert_eq!(tasks_b.len(), 1);
    assert_eq!(tasks_b[0]["title"], "wandering task");
}

#[tokio::test]
async fn same_board_move_stays_a_single_move_event() {
    let ctx = KanbanContext::in_memory();
    let (_board, todo) = init_board(&ctx, "A").await;

    let added = AddTask::new(todo.clone(), "stays home")
        .execute(&ctx)
        .await
        .unwrap();

    let mut rx = ctx.events().subscribe();
    MoveTask::new(added["id"].as_str().unwrap())
        .execute(&ctx)
        .await
        .unwrap();

    assert!(matches!(
        rx.recv().await.unwrap(),
        DomainEvent::TaskMoved { .. }
    ));
    assert!(rx.try_recv().is_err());
}
