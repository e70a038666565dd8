//! Pure derivations consumed by presentation layers.
//!
//! # Responsibility
//! - Turn an immutable task snapshot into todo, calendar and progress views.
//!
//! # Invariants
//! - No function here performs I/O, logs, or mutates its input.
//! - Every function is total over valid task lists, including empty ones.

pub mod calendar;
pub mod progress;
pub mod todo;
