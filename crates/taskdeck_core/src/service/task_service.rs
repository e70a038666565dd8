//! Task use-case service.
//!
//! # Responsibility
//! - Provide add/toggle/update/delete/list entry points for core callers.
//! - Validate input before anything reaches the store.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Store failures are surfaced unchanged; the service never retries.
//! - Log lines carry IDs, counts and durations only, never task text.

use crate::model::task::{
    Category, CompletionChange, OwnerId, Priority, Task, TaskId, TaskPatch, TaskValidationError,
};
use crate::repo::task_repo::{RepoError, TaskRepository};
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use std::time::Instant;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for task use-cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Request model for adding a to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
            priority: Priority::default(),
            deadline: None,
        }
    }

    pub fn due(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Request model for adding a calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: Option<NaiveDate>,
}

/// Use-case service wrapper over a task store.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Adds an incomplete task for `owner_id`.
    ///
    /// # Contract
    /// - Blank text or the synthetic `Event` category is rejected with no
    ///   store call.
    /// - `created_at` is `now`.
    pub fn add_task(
        &self,
        owner_id: &str,
        request: &NewTask,
        now: DateTime<Utc>,
    ) -> ServiceResult<Task> {
        let task = Task::new_task(owner_id, request.text.as_str(), request.category, now)?
            .with_priority(request.priority)
            .with_deadline(request.deadline);
        self.persist_new(task)
    }

    /// Adds a calendar event for `owner_id`.
    pub fn add_event(
        &self,
        owner_id: &str,
        request: &NewEvent,
        now: DateTime<Utc>,
    ) -> ServiceResult<Task> {
        let event = Task::new_event(owner_id, request.title.as_str(), request.date, now)?;
        self.persist_new(event)
    }

    /// Flips completion state of one task and returns the stored result.
    pub fn toggle_completion(
        &self,
        owner_id: &str,
        id: TaskId,
        now: DateTime<Utc>,
    ) -> ServiceResult<Task> {
        let current = self
            .repo
            .get_task(owner_id, id)?
            .ok_or(ServiceError::NotFound(id))?;
        let change = if current.completed {
            CompletionChange::Reopen
        } else {
            CompletionChange::Complete { at: now }
        };
        let updated = self
            .repo
            .update_task(owner_id, id, &TaskPatch::completion(change))?;
        info!(
            "event=task_toggle module=service status=ok task_id={} completed={}",
            id, updated.completed
        );
        Ok(updated)
    }

    /// Applies an edit-in-place patch.
    pub fn update_task(
        &self,
        owner_id: &str,
        id: TaskId,
        patch: &TaskPatch,
    ) -> ServiceResult<Task> {
        if patch.is_empty() {
            return self
                .repo
                .get_task(owner_id, id)?
                .ok_or(ServiceError::NotFound(id));
        }
        let updated = self.repo.update_task(owner_id, id, patch)?;
        info!("event=task_update module=service status=ok task_id={id}");
        Ok(updated)
    }

    /// Deletes one task.
    ///
    /// Returns `false` when the task was already gone; a repeated delete is
    /// not an error for callers.
    pub fn delete_task(&self, owner_id: &str, id: TaskId) -> ServiceResult<bool> {
        match self.repo.delete_task(owner_id, id) {
            Ok(()) => {
                info!("event=task_delete module=service status=ok task_id={id}");
                Ok(true)
            }
            Err(RepoError::NotFound(_)) => {
                warn!("event=task_delete module=service status=noop task_id={id} reason=not_found");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Current snapshot of all records owned by `owner_id`.
    pub fn list_tasks(&self, owner_id: &str) -> ServiceResult<Vec<Task>> {
        let started_at = Instant::now();
        let tasks = self.repo.list_tasks(owner_id)?;
        info!(
            "event=task_list module=service status=ok count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(tasks)
    }

    fn persist_new(&self, task: Task) -> ServiceResult<Task> {
        self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={} kind={} category={}",
            task.id,
            task.kind,
            task.category.slug()
        );
        Ok(task)
    }
}

/// Owner identity helper for callers holding an optional session user.
pub fn require_owner(current_user: Option<&str>) -> ServiceResult<OwnerId> {
    match current_user.map(str::trim) {
        Some(owner) if !owner.is_empty() => Ok(owner.to_string()),
        _ => Err(TaskValidationError::EmptyOwner.into()),
    }
}
