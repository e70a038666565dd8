//! Unified domain model for todo, calendar and progress projections.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one task shape for both to-do items and calendar events.
//!
//! # Invariants
//! - Every record is identified by a stable `TaskId`.
//! - Records are validated on construction, patching and deserialization.

pub mod task;
