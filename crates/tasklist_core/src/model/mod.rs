//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record and its calendar date type.
//! - Gate every write behind `validation::validate`.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - A `ValidTask` can only be produced by the validator.

pub mod task;
pub mod validation;
