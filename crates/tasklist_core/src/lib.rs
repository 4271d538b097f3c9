//! Core task store for the Tasklist mobile app.
//! This crate is the single source of truth for task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{Task, TaskDate, TaskId, TaskStatus, CANONICAL_DATE_FORMAT};
pub use model::validation::{
    parse_task_id, validate, TaskDraft, ValidTask, ValidationError, ValidationField,
};
pub use repo::task_repo::{
    PersistenceError, PersistenceResult, SqliteTaskRepository, TaskRepository,
};
pub use service::list_cache::ListCache;
pub use service::task_service::{TaskError, TaskService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
