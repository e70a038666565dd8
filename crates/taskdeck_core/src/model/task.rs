//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by the todo list, calendar and
//!   progress projections.
//! - Own the completion transition rule (`completed` <-> `completed_at`).
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `completed_at` is `Some` if and only if `completed` is `true`.
//! - `kind == TaskKind::Event` if and only if `category == Category::Event`.
//! - `text` and `owner_id` are never blank.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of a task or event record.
pub type TaskId = Uuid;

/// Identifier of the user owning a task. Every store call is scoped by it.
pub type OwnerId = String;

/// Variant tag separating to-do items from calendar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Actionable item that counts toward category progress.
    Task,
    /// Calendar-only entry tagged with [`Category::Event`].
    Event,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Event => "event",
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single category enumeration consumed by every view.
///
/// `Work`, `Personal` and `Study` are the tracked task categories. `Event`
/// is synthetic and only ever paired with [`TaskKind::Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Study,
    Event,
}

impl Category {
    /// Categories that take part in progress tracking, in display order. Never contains `Event`.
    pub const TRACKED: [Category; 3] = [Category::Work, Category::Personal, Category::Study];

    /// Display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Study => "Study",
            Self::Event => "Event",
        }
    }

    /// Lowercase slug used in storage and category detail routes.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Study => "study",
            Self::Event => "event",
        }
    }

    /// Parses a slug or label, ignoring case and surrounding whitespace.
    pub fn from_slug(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Some(Self::Work),
            "personal" => Some(Self::Personal),
            "study" => Some(Self::Study),
            "event" => Some(Self::Event),
            _ => None,
        }
    }

    /// Chart color as a hex RGB string.
    pub fn color(self) -> &'static str {
        match self {
            Self::Work => "#ff4444",
            Self::Personal => "#66cc66",
            Self::Study => "#4444ff",
            Self::Event => "#1d4ed8",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task urgency used by the category detail ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, lower first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Validation failures for task records and calendar inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    #[error("task id must not be nil")]
    NilId,
    #[error("task text must not be empty")]
    EmptyText,
    #[error("owner id must not be empty")]
    EmptyOwner,
    #[error("completed_at must be set exactly when completed is true (completed={completed})")]
    CompletionMismatch { completed: bool },
    #[error("task kind `{kind}` cannot use category `{category}`")]
    KindCategoryMismatch { kind: TaskKind, category: Category },
    #[error("month must be within 1..=12, got {0}")]
    InvalidMonth(u32),
    #[error("year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),
}

/// Requested change of completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChange {
    /// Mark completed. `at` is recorded only on a false -> true transition.
    Complete { at: DateTime<Utc> },
    /// Mark incomplete and clear `completed_at`.
    Reopen,
}

/// Partial update applied by the store's `update` operation.
///
/// `id`, `owner_id`, `kind` and `created_at` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the deadline.
    pub deadline: Option<Option<NaiveDate>>,
    pub completion: Option<CompletionChange>,
}

impl TaskPatch {
    /// Patch that only changes completion state.
    pub fn completion(change: CompletionChange) -> Self {
        Self {
            completion: Some(change),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && self.completion.is_none()
    }
}

/// Canonical task/event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub owner_id: OwnerId,
    pub kind: TaskKind,
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    /// Day-granularity due date. Events use it as their calendar date.
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an incomplete task in a tracked category with a fresh ID.
    ///
    /// # Errors
    /// - `EmptyText` / `EmptyOwner` for blank input.
    /// - `KindCategoryMismatch` when `category` is [`Category::Event`].
    pub fn new_task(
        owner_id: impl Into<OwnerId>,
        text: impl Into<String>,
        category: Category,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(
            Uuid::new_v4(),
            owner_id,
            TaskKind::Task,
            text,
            category,
            created_at,
        )
    }

    /// Creates a calendar event on `date` with a fresh ID.
    pub fn new_event(
        owner_id: impl Into<OwnerId>,
        title: impl Into<String>,
        date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let event = Self::with_id(
            Uuid::new_v4(),
            owner_id,
            TaskKind::Event,
            title,
            Category::Event,
            created_at,
        )?;
        Ok(event.with_deadline(date))
    }

    /// Creates a record with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: TaskId,
        owner_id: impl Into<OwnerId>,
        kind: TaskKind,
        text: impl Into<String>,
        category: Category,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            owner_id: owner_id.into(),
            kind,
            text: text.into(),
            category,
            priority: Priority::default(),
            deadline: None,
            completed: false,
            completed_at: None,
            created_at,
        };
        task.validate()?;
        Ok(task)
    }

    pub fn with_deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_event(&self) -> bool {
        self.kind == TaskKind::Event
    }

    /// Checks every record invariant.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.owner_id.trim().is_empty() {
            return Err(TaskValidationError::EmptyOwner);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        if self.completed != self.completed_at.is_some() {
            return Err(TaskValidationError::CompletionMismatch {
                completed: self.completed,
            });
        }
        let category_is_event = self.category == Category::Event;
        if self.is_event() != category_is_event {
            return Err(TaskValidationError::KindCategoryMismatch {
                kind: self.kind,
                category: self.category,
            });
        }
        Ok(())
    }

    /// Applies a completion change.
    ///
    /// Completing an already completed task keeps its original timestamp.
    pub fn apply_completion(&mut self, change: CompletionChange) {
        match change {
            CompletionChange::Complete { at } => {
                if !self.completed {
                    self.completed = true;
                    self.completed_at = Some(at);
                }
            }
            CompletionChange::Reopen => {
                self.completed = false;
                self.completed_at = None;
            }
        }
    }

    /// Flips completion state, stamping `now` when it becomes completed.
    pub fn toggle_completion(&mut self, now: DateTime<Utc>) {
        let change = if self.completed {
            CompletionChange::Reopen
        } else {
            CompletionChange::Complete { at: now }
        };
        self.apply_completion(change);
    }

    /// Returns a copy with `patch` applied, or the validation error it causes.
    ///
    /// `self` is never modified, so a rejected patch leaves no partial state.
    pub fn patched(&self, patch: &TaskPatch) -> Result<Task, TaskValidationError> {
        let mut next = self.clone();
        if let Some(text) = &patch.text {
            next.text = text.clone();
        }
        if let Some(category) = patch.category {
            next.category = category;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(deadline) = patch.deadline {
            next.deadline = deadline;
        }
        if let Some(change) = patch.completion {
            next.apply_completion(change);
        }
        next.validate()?;
        Ok(next)
    }
}

/// Unchecked wire shape; converted into [`Task`] only after validation.
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    owner_id: OwnerId,
    kind: TaskKind,
    text: String,
    category: Category,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    deadline: Option<NaiveDate>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Task {
            id: record.id,
            owner_id: record.owner_id,
            kind: record.kind,
            text: record.text,
            category: record.category,
            priority: record.priority,
            deadline: record.deadline,
            completed: record.completed,
            completed_at: record.completed_at,
            created_at: record.created_at,
        };
        task.validate()?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn completing_twice_keeps_first_timestamp() {
        let mut task = Task::new_task("u1", "write report", Category::Work, at(8)).unwrap();
        task.apply_completion(CompletionChange::Complete { at: at(9) });
        task.apply_completion(CompletionChange::Complete { at: at(10) });
        assert_eq!(task.completed_at, Some(at(9)));
    }

    #[test]
    fn rejected_patch_leaves_original_untouched() {
        let task = Task::new_task("u1", "read", Category::Study, at(8)).unwrap();
        let patch = TaskPatch {
            text: Some("   ".to_string()),
            ..TaskPatch::default()
        };
        assert_eq!(task.patched(&patch), Err(TaskValidationError::EmptyText));
        assert_eq!(task.text, "read");
    }

    #[test]
    fn category_slug_parsing_is_case_insensitive() {
        assert_eq!(Category::from_slug(" Study "), Some(Category::Study));
        assert_eq!(Category::from_slug("WORK"), Some(Category::Work));
        assert_eq!(Category::from_slug("health"), None);
    }
}
