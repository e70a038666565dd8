#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use taskdeck_core::{Category, Priority, Task};

pub const OWNER: &str = "u1";

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn created(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
}

pub fn task(text: &str, category: Category, minute: i64, deadline: Option<NaiveDate>) -> Task {
    Task::new_task(OWNER, text, category, created(minute))
        .unwrap()
        .with_deadline(deadline)
}

pub fn completed(mut task: Task, at: DateTime<Utc>) -> Task {
    task.toggle_completion(at);
    task
}

pub fn event(title: &str, minute: i64, date: NaiveDate) -> Task {
    Task::new_event(OWNER, title, Some(date), created(minute)).unwrap()
}

pub fn texts(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.text.as_str()).collect()
}

/// Arbitrary task lists around early 2024, including events and completions.
pub fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    let entry = (
        0usize..4,
        proptest::option::of(0i64..120),
        proptest::option::of(0i64..10_000),
        0i64..5_000,
        0usize..3,
    );
    proptest::collection::vec(entry, 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, (kind, deadline, done, minute, priority))| {
                let deadline = deadline.map(|days| ymd(2024, 1, 1) + Duration::days(days));
                let text = format!("item-{index}");
                let mut item = if kind == 3 {
                    Task::new_event(OWNER, text, deadline, created(minute)).unwrap()
                } else {
                    let priority = [Priority::High, Priority::Medium, Priority::Low][priority];
                    Task::new_task(OWNER, text, Category::TRACKED[kind], created(minute))
                        .unwrap()
                        .with_deadline(deadline)
                        .with_priority(priority)
                };
                if let Some(offset) = done {
                    item.toggle_completion(created(offset));
                }
                item
            })
            .collect()
    })
}
