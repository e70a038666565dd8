//! Task store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the owner-scoped data access contract consumed by services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to storage transport errors.

pub mod memory_repo;
pub mod task_repo;
