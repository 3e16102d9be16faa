//! End-to-end board behavior: mutations, codec round trips, drag commits.

use kanfile_app::{Board, DragCoordinator, DropTarget};
use kanfile_core::{export, Priority, Status, Task, TaskDraft, TaskId};
use kanfile_store_json::MemoryStore;
use std::collections::BTreeSet;
use time::macros::datetime;
use time::OffsetDateTime;

fn open_board() -> Board<MemoryStore> {
    Board::open(MemoryStore::new()).unwrap_or_else(|err| panic!("must open board: {err}"))
}

fn add(board: &mut Board<MemoryStore>, title: &str, status: Status, priority: Priority) -> Task {
    board
        .add(TaskDraft {
            title: title.into(),
            status,
            priority,
            due_date: Some(datetime!(2025-06-12 09:00 UTC)),
            tags: BTreeSet::from(["roundtrip".to_owned()]),
            ..TaskDraft::default()
        })
        .unwrap_or_else(|err| panic!("must add task: {err}"))
}

#[test]
fn export_then_import_restores_the_collection() {
    let mut source = open_board();
    add(&mut source, "alpha", Status::Todo, Priority::High);
    add(&mut source, "beta", Status::InProgress, Priority::Medium);
    add(&mut source, "gamma", Status::Done, Priority::Low);

    let payload = export::to_json(source.tasks(), OffsetDateTime::now_utc())
        .unwrap_or_else(|err| panic!("must export: {err}"));

    let mut target = open_board();
    let summary = target.import(&payload).unwrap_or_else(|err| panic!("must import: {err}"));
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.skipped, 0);

    for (restored, original) in target.tasks().iter().zip(source.tasks()) {
        assert_eq!(restored.id, original.id);
        assert_eq!(restored.title, original.title);
        assert_eq!(restored.status, original.status);
        assert_eq!(restored.priority, original.priority);
        assert_eq!(restored.created_at, original.created_at);
        assert_eq!(restored.due_date, original.due_date);
        assert_eq!(restored.tags, original.tags);
    }
}

#[test]
fn importing_an_existing_id_leaves_the_collection_unchanged() {
    let mut board = open_board();
    let existing = add(&mut board, "original", Status::InProgress, Priority::Medium);
    let before: Vec<Task> = board.tasks().to_vec();

    let payload = format!(
        r#"{{"tasks":[{{"id":"{}","title":"X","status":"todo","priority":"low"}}]}}"#,
        existing.id
    );
    let summary = board.import(&payload).unwrap_or_else(|err| panic!("must import: {err}"));
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(board.tasks(), before.as_slice());
}

#[test]
fn rejected_imports_leave_the_collection_unchanged() {
    let mut board = open_board();
    add(&mut board, "keep me", Status::Todo, Priority::Low);
    let before: Vec<Task> = board.tasks().to_vec();

    let err = board
        .import(r#"{"tasks":[{"id":"x","title":"no status","priority":"low"}]}"#)
        .expect_err("incomplete record must be rejected");
    assert!(err.to_string().contains("status"));
    assert_eq!(board.tasks(), before.as_slice());
}

#[test]
fn same_column_drag_is_a_permutation() {
    let mut board = open_board();
    let a = add(&mut board, "a", Status::Todo, Priority::Low);
    add(&mut board, "b", Status::Todo, Priority::Low);
    let c = add(&mut board, "c", Status::Todo, Priority::Low);

    let ids_before: BTreeSet<TaskId> =
        board.tasks().iter().map(|task| task.id.clone()).collect();

    let mut coordinator = DragCoordinator::new();
    assert!(coordinator.begin(board.tasks(), &a.id));
    let effect = coordinator.drop_on(board.tasks(), Some(&DropTarget::Task(c.id.clone())));
    board.apply_drop(effect).unwrap_or_else(|err| panic!("must apply drop: {err}"));

    let ids_after: BTreeSet<TaskId> = board.tasks().iter().map(|task| task.id.clone()).collect();
    assert_eq!(ids_before, ids_after);
    assert!(board.tasks().iter().all(|task| task.status == Status::Todo));

    let order: Vec<&str> = board.tasks().iter().map(|task| task.title.as_str()).collect();
    assert_eq!(order, vec!["b", "c", "a"]);
}

#[test]
fn cross_column_drop_commits_the_previewed_status() {
    let mut board = open_board();
    let dragged = add(&mut board, "dragged", Status::Todo, Priority::Low);
    add(&mut board, "parked", Status::InProgress, Priority::Low);

    let mut coordinator = DragCoordinator::new();
    coordinator.begin(board.tasks(), &dragged.id);
    coordinator.hover(board.tasks(), Some(&DropTarget::Column(Status::InProgress)));
    // Hovering previews only; the committed collection still says todo.
    assert_eq!(
        board
            .get(&dragged.id)
            .map(|task| task.status),
        Some(Status::Todo)
    );

    let effect = coordinator.drop_on(board.tasks(), Some(&DropTarget::Column(Status::InProgress)));
    board.apply_drop(effect).unwrap_or_else(|err| panic!("must apply drop: {err}"));
    assert_eq!(
        board.get(&dragged.id).map(|task| task.status),
        Some(Status::InProgress)
    );
}

#[test]
fn csv_and_markdown_exports_cover_every_task() {
    let mut board = open_board();
    add(&mut board, "alpha", Status::Todo, Priority::High);
    add(&mut board, "beta", Status::Done, Priority::Low);

    let csv = export::to_csv(board.tasks()).unwrap_or_else(|err| panic!("must export: {err}"));
    assert_eq!(csv.trim_end().lines().count(), 1 + board.tasks().len());

    let markdown = export::to_markdown(board.tasks(), OffsetDateTime::now_utc())
        .unwrap_or_else(|err| panic!("must export: {err}"));
    for task in board.tasks() {
        assert!(markdown.contains(&task.title));
    }
}
