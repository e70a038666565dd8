use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use taskdeck_core::{Category, Priority, Task, TaskKind, TaskValidationError};
use uuid::Uuid;

const FIXED_ID: &str = "11111111-2222-4333-8444-555555555555";

#[test]
fn new_task_sets_defaults() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let task = Task::new_task("u1", "plan sprint", Category::Work, created_at).unwrap();

    assert!(!task.id.is_nil());
    assert_eq!(task.kind, TaskKind::Task);
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.deadline, None);
    assert!(!task.completed);
    assert_eq!(task.completed_at, None);
    assert_eq!(task.created_at, created_at);
}

#[test]
fn constructors_reject_blank_input_and_event_category() {
    let now = Utc::now();
    assert_eq!(
        Task::new_task("u1", "  ", Category::Work, now).unwrap_err(),
        TaskValidationError::EmptyText
    );
    assert_eq!(
        Task::new_task("", "x", Category::Work, now).unwrap_err(),
        TaskValidationError::EmptyOwner
    );
    assert_eq!(
        Task::new_task("u1", "x", Category::Event, now).unwrap_err(),
        TaskValidationError::KindCategoryMismatch {
            kind: TaskKind::Task,
            category: Category::Event
        }
    );
    assert_eq!(
        Task::new_event("u1", "", None, now).unwrap_err(),
        TaskValidationError::EmptyText
    );
}

#[test]
fn toggle_completion_stamps_and_clears() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let done_at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
    let mut task = Task::new_task("u1", "gym", Category::Personal, created_at).unwrap();

    task.toggle_completion(done_at);
    assert!(task.completed);
    assert_eq!(task.completed_at, Some(done_at));

    task.toggle_completion(done_at);
    assert!(!task.completed);
    assert_eq!(task.completed_at, None);
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str(FIXED_ID).unwrap();
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let completed_at = Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap();
    let mut task = Task::with_id(id, "u1", TaskKind::Task, "essay", Category::Study, created_at)
        .unwrap()
        .with_priority(Priority::High)
        .with_deadline(NaiveDate::from_ymd_opt(2024, 5, 10));
    task.toggle_completion(completed_at);

    let value = serde_json::to_value(&task).unwrap();
    assert_eq!(value["id"], FIXED_ID);
    assert_eq!(value["owner_id"], "u1");
    assert_eq!(value["kind"], "task");
    assert_eq!(value["category"], "Study");
    assert_eq!(value["priority"], "high");
    assert_eq!(value["deadline"], "2024-05-10");
    assert_eq!(value["completed"], true);
    assert_eq!(value["completed_at"], "2024-05-03T12:00:00Z");

    let decoded: Task = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialize_fills_optional_fields() {
    let value = json!({
        "id": FIXED_ID,
        "owner_id": "u1",
        "kind": "event",
        "text": "conference",
        "category": "Event",
        "created_at": "2024-05-01T08:00:00Z"
    });

    let decoded: Task = serde_json::from_value(value).unwrap();
    assert_eq!(decoded.priority, Priority::Medium);
    assert_eq!(decoded.deadline, None);
    assert!(!decoded.completed);
    assert!(decoded.is_event());
}

#[test]
fn deserialize_rejects_inconsistent_records() {
    let completed_without_timestamp = json!({
        "id": FIXED_ID,
        "owner_id": "u1",
        "kind": "task",
        "text": "x",
        "category": "Work",
        "completed": true,
        "created_at": "2024-05-01T08:00:00Z"
    });
    assert!(serde_json::from_value::<Task>(completed_without_timestamp).is_err());

    let event_in_work_category = json!({
        "id": FIXED_ID,
        "owner_id": "u1",
        "kind": "event",
        "text": "x",
        "category": "Work",
        "created_at": "2024-05-01T08:00:00Z"
    });
    assert!(serde_json::from_value::<Task>(event_in_work_category).is_err());

    let nil_id = json!({
        "id": Uuid::nil().to_string(),
        "owner_id": "u1",
        "kind": "task",
        "text": "x",
        "category": "Work",
        "created_at": "2024-05-01T08:00:00Z"
    });
    assert!(serde_json::from_value::<Task>(nil_id).is_err());
}

#[test]
fn category_metadata_matches_chart_palette() {
    assert_eq!(Category::Work.color(), "#ff4444");
    assert_eq!(Category::Personal.color(), "#66cc66");
    assert_eq!(Category::Study.color(), "#4444ff");
    assert!(!Category::TRACKED.contains(&Category::Event));
    assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
    assert!(Priority::High.rank() < Priority::Low.rank());
}
