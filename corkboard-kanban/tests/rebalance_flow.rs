//! End-to-end rebalance: an over-long allocation queues its container, the
//! background worker respaces it, and subscribers hear about it.

use corkboard_kanban::board::InitBoard;
use corkboard_kanban::store::Store;
use corkboard_kanban::task::AddTask;
use corkboard_kanban::types::PositionKey;
use corkboard_kanban::{
    BoardId, ColumnId, DomainEvent, Execute, KanbanContext, Task, REBALANCE_THRESHOLD,
};
use std::time::Duration;

/// A key so deeply nested that anything allocated next to it is over the
/// threshold. Built the same way sustained same-spot insertion builds one.
fn overlong_key() -> PositionKey {
    let lower = PositionKey::first();
    let mut key = PositionKey::from_string("a1");
    while !key.exceeds(REBALANCE_THRESHOLD) {
        key = PositionKey::between(Some(&lower), Some(&key)).unwrap();
    }
    key
}

#[tokio::test]
async fn overlong_allocation_triggers_worker_rebalance() {
    let ctx = KanbanContext::in_memory();
    ctx.spawn_rebalance_worker();

    let board = InitBoard::new("Test").execute(&ctx).await.unwrap();
    let board_id = BoardId::from_string(board["id"].as_str().unwrap());
    let todo = ColumnId::from_string(board["columns"][0]["id"].as_str().unwrap());

    // Recreate the aftermath of heavy same-spot insertion: a wedge task
    // sitting on a key just past the threshold, between two normal ones.
    let first = AddTask::new(todo.clone(), "first").execute(&ctx).await.unwrap();
    let wedge = Task::new(board_id.clone(), todo.clone(), "wedge", overlong_key());
    let wedge_id = wedge.id.clone();
    ctx.store().put_task(wedge).await.unwrap();
    AddTask::new(todo.clone(), "last").execute(&ctx).await.unwrap();

    let mut rx = ctx.events().subscribe();

    // This allocation lands between "first" and the wedge, grows past the
    // threshold, and queues the column.
    AddTask::new(todo.clone(), "trigger")
        .after(first["id"].as_str().unwrap())
        .before(wedge_id)
        .execute(&ctx)
        .await
        .unwrap();

    // The worker announces completion on the bus.
    let announced = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match rx.recv().await {
                Ok(DomainEvent::ContainerRebalanced {
                    column_id: Some(column_id),
                    ..
                }) if column_id == todo => break true,
                Ok(_) => continue,
                Err(_) => break false,
            }
        }
    })
    .await
    .unwrap();
    assert!(announced);

    // Keys are short again and the visual order survived.
    let tasks = ctx.store().tasks_in_column(&todo).await.unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "trigger", "wedge", "last"]);
    for task in &tasks {
        assert!(task.position.as_str().len() <= 2);
    }
}
