use tasklist_core::db::open_db_in_memory;
use tasklist_core::{
    ListCache, SqliteTaskRepository, TaskDraft, TaskError, TaskRepository, TaskService,
    ValidationField,
};
use uuid::Uuid;

#[test]
fn added_task_appears_in_pending_only() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let mut cache = ListCache::new();

    let task = service
        .add_task(
            &TaskDraft::new("Buy milk", "Mon Jan 01 2024", "Mon Jan 01 2024").with_description(""),
        )
        .unwrap();
    service.refresh(&mut cache).unwrap();

    assert_eq!(cache.pending(), [task.clone()]);
    assert!(cache.completed().is_empty());
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, None);
    assert_eq!(task.start_date.to_string(), "Mon Jan 01 2024");
    assert!(!task.completed);
}

#[test]
fn reversed_dates_fail_before_any_row_is_written() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let before = service.pending().unwrap().len();

    let err = service
        .add_task(&TaskDraft::new("Trip", "Wed Jan 10 2024", "Mon Jan 01 2024"))
        .unwrap_err();

    match err {
        TaskError::Validation(validation) => {
            assert_eq!(validation.field, ValidationField::DateRange)
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.pending().unwrap().len(), before);
    assert_eq!(service.repository().count().unwrap(), 0);
}

#[test]
fn blank_title_is_a_title_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    for title in ["", " ", "\t\n "] {
        let err = service
            .add_task(&TaskDraft::new(title, "2024-01-01", "2024-01-01"))
            .unwrap_err();
        assert!(
            matches!(&err, TaskError::Validation(v) if v.field == ValidationField::Title),
            "unexpected error for {title:?}: {err}"
        );
    }
}

#[test]
fn completing_moves_task_to_completed_list() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let mut cache = ListCache::new();

    let task = service
        .add_task(&TaskDraft::new("Call mom", "2024-01-01", "2024-01-02"))
        .unwrap();
    service.refresh(&mut cache).unwrap();
    assert_eq!(cache.pending().len(), 1);

    service.complete_task(task.id).unwrap();
    service.refresh(&mut cache).unwrap();

    assert!(cache.pending().is_empty());
    assert_eq!(cache.completed().len(), 1);
    assert_eq!(cache.completed()[0].id, task.id);
    assert!(cache.completed()[0].completed);
    assert_eq!(service.repository().count().unwrap(), 1);
}

#[test]
fn deleting_one_of_two_leaves_the_other() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let mut cache = ListCache::new();

    let first = service
        .add_task(&TaskDraft::new("first", "2024-01-01", "2024-01-01"))
        .unwrap();
    let second = service
        .add_task(&TaskDraft::new("second", "2024-01-01", "2024-01-01"))
        .unwrap();

    service.delete_task(first.id).unwrap();
    service.refresh(&mut cache).unwrap();

    assert_eq!(cache.pending(), [second]);
}

#[test]
fn unknown_ids_are_idempotent_successes() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let task = service
        .add_task(&TaskDraft::new("stay", "2024-01-01", "2024-01-01"))
        .unwrap();

    service.complete_task(Uuid::new_v4()).unwrap();
    service.delete_task(Uuid::new_v4()).unwrap();

    assert_eq!(service.pending().unwrap(), vec![task]);
    assert!(service.completed().unwrap().is_empty());
}

#[test]
fn cache_starts_empty_and_is_replaced_on_each_refresh() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);
    let mut cache = ListCache::new();

    assert!(!cache.is_populated());
    assert!(cache.pending().is_empty() && cache.completed().is_empty());

    service.refresh(&mut cache).unwrap();
    assert!(cache.is_populated());
    assert_eq!(cache.generation(), 1);

    let task = service
        .add_task(&TaskDraft::new("late", "2024-01-01", "2024-01-01"))
        .unwrap();
    // The mutation alone does not touch the snapshot.
    assert!(cache.pending().is_empty());

    service.refresh(&mut cache).unwrap();
    assert_eq!(cache.generation(), 2);
    assert_eq!(cache.pending(), [task]);
}

#[test]
fn failed_refresh_keeps_previous_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let mut cache = ListCache::new();

    service
        .add_task(&TaskDraft::new("kept", "2024-01-01", "2024-01-01"))
        .unwrap();
    service.refresh(&mut cache).unwrap();
    let snapshot = cache.clone();

    conn.execute(
        "INSERT INTO todos VALUES ('bogus-id', 't', NULL, 'Mon Jan 01 2024', 'Mon Jan 01 2024', 0);",
        [],
    )
    .unwrap();

    let err = service.refresh(&mut cache).unwrap_err();
    assert!(matches!(err, TaskError::Persistence(_)));
    assert_eq!(cache, snapshot);
}

#[test]
fn storage_failure_on_add_is_a_persistence_error() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    conn.execute_batch("DROP TABLE todos;").unwrap();

    let err = service
        .add_task(&TaskDraft::new("lost", "2024-01-01", "2024-01-02"))
        .unwrap_err();
    assert!(matches!(err, TaskError::Persistence(_)));
}

#[test]
fn list_reads_surface_storage_failures_as_task_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    conn.execute_batch("DROP TABLE todos;").unwrap();

    assert!(matches!(service.pending(), Err(TaskError::Persistence(_))));
    assert!(matches!(service.completed(), Err(TaskError::Persistence(_))));
}
