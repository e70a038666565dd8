//! In-memory task store.
//!
//! Mirrors the SQLite repository contract (owner scoping, ordering, error
//! semantics) without I/O. Used by tests and by callers that hold a snapshot
//! pushed from an external document store.

use crate::model::task::{Task, TaskId, TaskPatch};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with already validated records.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> RepoResult<Self> {
        let repo = Self::new();
        for task in tasks {
            repo.create_task(&task)?;
        }
        Ok(repo)
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Vec<Task>>> {
        self.tasks.lock().map_err(|_| RepoError::Poisoned)
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;
        let mut tasks = self.lock()?;
        if tasks.iter().any(|existing| existing.id == task.id) {
            return Err(RepoError::Conflict(task.id));
        }
        tasks.push(task.clone());
        Ok(task.id)
    }

    fn get_task(&self, owner_id: &str, id: TaskId) -> RepoResult<Option<Task>> {
        let tasks = self.lock()?;
        Ok(tasks
            .iter()
            .find(|task| task.id == id && task.owner_id == owner_id)
            .cloned())
    }

    fn list_tasks(&self, owner_id: &str) -> RepoResult<Vec<Task>> {
        let tasks = self.lock()?;
        let mut owned: Vec<Task> = tasks
            .iter()
            .filter(|task| task.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    fn update_task(&self, owner_id: &str, id: TaskId, patch: &TaskPatch) -> RepoResult<Task> {
        let mut tasks = self.lock()?;
        let slot = tasks
            .iter_mut()
            .find(|task| task.id == id && task.owner_id == owner_id)
            .ok_or(RepoError::NotFound(id))?;
        let next = slot.patched(patch)?;
        *slot = next.clone();
        Ok(next)
    }

    fn delete_task(&self, owner_id: &str, id: TaskId) -> RepoResult<()> {
        let mut tasks = self.lock()?;
        let before = tasks.len();
        tasks.retain(|task| !(task.id == id && task.owner_id == owner_id));
        if tasks.len() == before {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}
