//! Task store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD APIs over canonical `tasks` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the full record before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - A task belonging to another owner is indistinguishable from a missing one.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::task::{
    Category, Priority, Task, TaskId, TaskKind, TaskPatch, TaskValidationError,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    kind,
    text,
    category,
    priority,
    deadline,
    completed,
    completed_at,
    created_at
FROM tasks";

const DEADLINE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error taxonomy of the task store.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("task already exists: {0}")]
    Conflict(TaskId),
    /// I/O or engine failure; callers surface it unchanged and never retry.
    #[error("task store unavailable: {0}")]
    Unavailable(#[from] DbError),
    #[error("invalid persisted task data: {0}")]
    InvalidData(String),
    #[error("task store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Unavailable(DbError::Sqlite(value))
    }
}

/// Repository interface for owner-scoped task persistence.
pub trait TaskRepository {
    /// Persists a new record and returns its ID.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, owner_id: &str, id: TaskId) -> RepoResult<Option<Task>>;
    /// Snapshot of all records of one owner, ordered by `created_at, id`.
    fn list_tasks(&self, owner_id: &str) -> RepoResult<Vec<Task>>;
    /// Applies `patch` and returns the stored result.
    fn update_task(&self, owner_id: &str, id: TaskId, patch: &TaskPatch) -> RepoResult<Task>;
    fn delete_task(&self, owner_id: &str, id: TaskId) -> RepoResult<()>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        (**self).create_task(task)
    }

    fn get_task(&self, owner_id: &str, id: TaskId) -> RepoResult<Option<Task>> {
        (**self).get_task(owner_id, id)
    }

    fn list_tasks(&self, owner_id: &str) -> RepoResult<Vec<Task>> {
        (**self).list_tasks(owner_id)
    }

    fn update_task(&self, owner_id: &str, id: TaskId, patch: &TaskPatch) -> RepoResult<Task> {
        (**self).update_task(owner_id, id, patch)
    }

    fn delete_task(&self, owner_id: &str, id: TaskId) -> RepoResult<()> {
        (**self).delete_task(owner_id, id)
    }
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection whose schema is fully migrated.
    ///
    /// # Errors
    /// - `Unavailable(SchemaNotReady)` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let db_version = current_user_version(conn)?;
        let required = latest_version();
        if db_version < required {
            return Err(RepoError::Unavailable(DbError::SchemaNotReady {
                db_version,
                required,
            }));
        }
        Ok(Self { conn })
    }

    fn select_one(&self, owner_id: &str, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{TASK_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"
        ))?;
        let raw = stmt
            .query_row(params![id.to_string(), owner_id], read_raw_row)
            .optional()?;
        raw.map(decode_task).transpose()
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let exists = tx
            .query_row(
                "SELECT 1 FROM tasks WHERE id = ?1;",
                [task.id.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            return Err(RepoError::Conflict(task.id));
        }

        tx.execute(
            "INSERT INTO tasks (
                id,
                owner_id,
                kind,
                text,
                category,
                priority,
                deadline,
                completed,
                completed_at,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                task.id.to_string(),
                task.owner_id.as_str(),
                task.kind.as_str(),
                task.text.as_str(),
                task.category.slug(),
                task.priority.as_str(),
                task.deadline.map(format_deadline),
                task.completed,
                task.completed_at.map(format_timestamp),
                format_timestamp(task.created_at),
            ],
        )?;
        tx.commit()?;

        Ok(task.id)
    }

    fn get_task(&self, owner_id: &str, id: TaskId) -> RepoResult<Option<Task>> {
        self.select_one(owner_id, id)
    }

    fn list_tasks(&self, owner_id: &str) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{TASK_SELECT_SQL} WHERE owner_id = ?1 ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(decode_task(read_raw_row(row)?)?);
        }

        Ok(tasks)
    }

    fn update_task(&self, owner_id: &str, id: TaskId, patch: &TaskPatch) -> RepoResult<Task> {
        let tx = self.conn.unchecked_transaction()?;
        let current = self.select_one(owner_id, id)?.ok_or(RepoError::NotFound(id))?;
        let next = current.patched(patch)?;

        tx.execute(
            "UPDATE tasks
             SET
                text = ?1,
                category = ?2,
                priority = ?3,
                deadline = ?4,
                completed = ?5,
                completed_at = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7 AND owner_id = ?8;",
            params![
                next.text.as_str(),
                next.category.slug(),
                next.priority.as_str(),
                next.deadline.map(format_deadline),
                next.completed,
                next.completed_at.map(format_timestamp),
                id.to_string(),
                owner_id,
            ],
        )?;
        tx.commit()?;

        Ok(next)
    }

    fn delete_task(&self, owner_id: &str, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

struct RawTaskRow {
    id: String,
    owner_id: String,
    kind: String,
    text: String,
    category: String,
    priority: String,
    deadline: Option<String>,
    completed: i64,
    completed_at: Option<String>,
    created_at: String,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawTaskRow> {
    Ok(RawTaskRow {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        kind: row.get("kind")?,
        text: row.get("text")?,
        category: row.get("category")?,
        priority: row.get("priority")?,
        deadline: row.get("deadline")?,
        completed: row.get("completed")?,
        completed_at: row.get("completed_at")?,
        created_at: row.get("created_at")?,
    })
}

fn decode_task(raw: RawTaskRow) -> RepoResult<Task> {
    let id = Uuid::parse_str(&raw.id)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{}` in tasks.id", raw.id)))?;
    let kind = parse_kind(&raw.kind).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{}` in tasks.kind", raw.kind))
    })?;
    let category = Category::from_slug(&raw.category).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{}` in tasks.category",
            raw.category
        ))
    })?;
    let priority = Priority::parse(&raw.priority).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{}` in tasks.priority",
            raw.priority
        ))
    })?;
    let deadline = raw
        .deadline
        .as_deref()
        .map(|value| {
            NaiveDate::parse_from_str(value, DEADLINE_FORMAT).map_err(|_| {
                RepoError::InvalidData(format!("invalid date `{value}` in tasks.deadline"))
            })
        })
        .transpose()?;
    let completed = match raw.completed {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };
    let completed_at = raw
        .completed_at
        .as_deref()
        .map(|value| parse_timestamp(value, "tasks.completed_at"))
        .transpose()?;
    let created_at = parse_timestamp(&raw.created_at, "tasks.created_at")?;

    let task = Task {
        id,
        owner_id: raw.owner_id,
        kind,
        text: raw.text,
        category,
        priority,
        deadline,
        completed,
        completed_at,
        created_at,
    };
    task.validate()?;
    Ok(task)
}

fn parse_kind(value: &str) -> Option<TaskKind> {
    match value {
        "task" => Some(TaskKind::Task),
        "event" => Some(TaskKind::Event),
        _ => None,
    }
}

fn format_deadline(date: NaiveDate) -> String {
    date.format(DEADLINE_FORMAT).to_string()
}

// Fixed-width nanosecond form keeps `ORDER BY created_at` chronological.
fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}
