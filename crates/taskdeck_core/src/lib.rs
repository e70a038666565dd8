//! Core domain logic for Taskdeck.
//! This crate is the single source of truth for task invariants and the
//! todo, calendar and progress projections derived from them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{ensure_default_config, load_config, ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{
    Category, CompletionChange, OwnerId, Priority, Task, TaskId, TaskKind, TaskPatch,
    TaskValidationError,
};
pub use repo::memory_repo::InMemoryTaskRepository;
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_service::{
    require_owner, NewEvent, NewTask, ServiceError, ServiceResult, TaskService,
};
pub use view::calendar::{derive_calendar_view, CalendarView, DateSelection, YearMonth};
pub use view::progress::{derive_category_view, CategoryView};
pub use view::todo::{derive_category_detail, derive_todo_view, CategoryDetail, StatusFilter};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
