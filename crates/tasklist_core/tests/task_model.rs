use tasklist_core::{validate, Task, TaskDate, TaskDraft, TaskStatus};
use uuid::Uuid;

#[test]
fn task_new_sets_defaults() {
    let valid = validate(&TaskDraft::new("hello", "2024-01-01", "2024-01-02")).unwrap();
    let task = Task::new(valid);

    assert!(!task.id.is_nil());
    assert_eq!(task.title, "hello");
    assert_eq!(task.description, None);
    assert!(!task.completed);
    assert_eq!(task.status(), TaskStatus::Pending);
}

#[test]
fn status_flags_match_storage_encoding() {
    assert_eq!(TaskStatus::Pending.as_flag(), 0);
    assert_eq!(TaskStatus::Completed.as_flag(), 1);
    assert_eq!(TaskStatus::from_flag(1), Some(TaskStatus::Completed));
    assert_eq!(TaskStatus::from_flag(2), None);
}

#[test]
fn task_date_orders_by_calendar_not_by_text() {
    // "Fri" sorts before "Mon" as text, but Jan 05 is after Jan 01.
    let later = TaskDate::parse("Fri Jan 05 2024").unwrap();
    let earlier = TaskDate::parse("Mon Jan 01 2024").unwrap();
    assert!(earlier < later);
}

#[test]
fn canonical_parse_rejects_iso_and_padded_input() {
    assert_eq!(
        TaskDate::parse_canonical("Mon Jan 01 2024"),
        TaskDate::from_ymd(2024, 1, 1)
    );
    assert!(TaskDate::parse_canonical("2024-01-01").is_none());
    assert!(TaskDate::parse_canonical(" Mon Jan 01 2024").is_none());
    assert!(TaskDate::parse("2024-01-01").is_some());
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let valid = validate(
        &TaskDraft::new("Ship release", "2024-02-29", "2024-03-01").with_description("v0.1"),
    )
    .unwrap();
    let task = Task::with_id(id, valid);

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "Ship release");
    assert_eq!(json["description"], "v0.1");
    assert_eq!(json["startDate"], "Thu Feb 29 2024");
    assert_eq!(json["endDate"], "Fri Mar 01 2024");
    assert_eq!(json["completed"], false);

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialize_rejects_invalid_date() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "bad",
        "description": null,
        "startDate": "Fri Jan 01 2024",
        "endDate": "Mon Jan 01 2024",
        "completed": false
    });

    let err = serde_json::from_value::<Task>(value).unwrap_err();
    assert!(
        err.to_string().contains("invalid task date `Fri Jan 01 2024`"),
        "unexpected error: {err}"
    );
}
