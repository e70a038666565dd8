//! Filtering, ordering and date bucketing over a task snapshot.
//!
//! # Invariants
//! - Inputs are never mutated; every function returns a new `Vec`.
//! - All orderings are stable: equal keys preserve input order.
//! - Dates compare at day granularity only.

use crate::model::task::{Category, Task, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Completion filter of the to-do list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// True for an open, non-event task whose deadline is strictly before `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if task.completed || task.is_event() {
        return false;
    }
    task.deadline.is_some_and(|deadline| deadline < today)
}

/// Deadline-bearing tasks first (ascending, then by creation), followed by
/// the remaining tasks in their original order.
pub fn sort_by_deadline_then_creation(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        deadline_missing_last(a.deadline, b.deadline).then_with(|| {
            // Undated tasks keep insertion order.
            if a.deadline.is_some() {
                a.created_at.cmp(&b.created_at)
            } else {
                Ordering::Equal
            }
        })
    });
    sorted
}

/// Category detail ordering: open before completed, then priority rank,
/// then deadline with a missing deadline last inside its priority tier.
pub fn sort_by_priority_then_deadline(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
            .then_with(|| deadline_missing_last(a.deadline, b.deadline))
    });
    sorted
}

pub fn filter_by_status(tasks: &[Task], mode: StatusFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| mode.matches(task))
        .cloned()
        .collect()
}

/// Open items due today or later, ascending by deadline.
pub fn upcoming_items(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut upcoming: Vec<Task> = tasks
        .iter()
        .filter(|task| !task.completed && task.deadline.is_some_and(|deadline| deadline >= today))
        .cloned()
        .collect();
    upcoming.sort_by_key(|task| task.deadline);
    upcoming
}

/// Overdue tasks, oldest deadline first.
pub fn overdue_items(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut overdue: Vec<Task> = tasks
        .iter()
        .filter(|task| is_overdue(task, today))
        .cloned()
        .collect();
    overdue.sort_by_key(|task| task.deadline);
    overdue
}

/// Every task or event whose deadline falls on `date`.
pub fn tasks_on_date(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.deadline == Some(date))
        .cloned()
        .collect()
}

/// Ordered to-do list for the given filter.
pub fn derive_todo_view(tasks: &[Task], mode: StatusFilter) -> Vec<Task> {
    sort_by_deadline_then_creation(&filter_by_status(tasks, mode))
}

/// Detail page of a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDetail {
    pub category: Category,
    /// Counted before `show_completed` filtering.
    pub total: usize,
    pub completed: usize,
    pub items: Vec<Task>,
    // Every member of the category, including hidden completed ones.
    #[serde(skip)]
    members: Vec<Task>,
}

impl CategoryDetail {
    /// Drops a deleted task and recounts. Returns whether it belonged to the category.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.members.len();
        self.members.retain(|task| task.id != id);
        if self.members.len() == before {
            return false;
        }
        self.items.retain(|task| task.id != id);
        self.total = self.members.len();
        self.completed = self.members.iter().filter(|task| task.completed).count();
        true
    }
}

pub fn derive_category_detail(
    tasks: &[Task],
    category: Category,
    show_completed: bool,
) -> CategoryDetail {
    let members: Vec<Task> = tasks
        .iter()
        .filter(|task| task.category == category)
        .cloned()
        .collect();
    let completed = members.iter().filter(|task| task.completed).count();
    let mode = if show_completed {
        StatusFilter::All
    } else {
        StatusFilter::Active
    };

    CategoryDetail {
        category,
        total: members.len(),
        completed,
        items: sort_by_priority_then_deadline(&filter_by_status(&members, mode)),
        members,
    }
}

fn deadline_missing_last(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
