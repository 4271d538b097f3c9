//! In-memory snapshot of the pending and completed task lists.
//!
//! # Responsibility
//! - Hold the latest list results for rendering.
//! - Replace both lists wholesale on every refresh.
//!
//! # Invariants
//! - Starts empty and unpopulated.
//! - There is no partial-update path: a refresh re-queries both lists and
//!   swaps them in only after both queries succeed.
//! - `generation` increases by one per successful refresh.

use crate::model::task::Task;
use crate::repo::task_repo::{PersistenceResult, TaskRepository};
use log::debug;

/// Owned list snapshot passed by reference to whoever renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCache {
    pending: Vec<Task>,
    completed: Vec<Task>,
    generation: u64,
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-reads both lists from the repository and replaces the snapshot.
    ///
    /// On error the previous snapshot is kept unchanged.
    pub fn refresh<R: TaskRepository + ?Sized>(&mut self, repo: &R) -> PersistenceResult<()> {
        let pending = repo.list_pending()?;
        let completed = repo.list_completed()?;

        self.pending = pending;
        self.completed = completed;
        self.generation += 1;

        debug!(
            "event=list_cache_refresh module=service status=ok generation={} pending={} completed={}",
            self.generation,
            self.pending.len(),
            self.completed.len()
        );
        Ok(())
    }

    pub fn pending(&self) -> &[Task] {
        &self.pending
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    /// Number of successful refreshes since creation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether at least one refresh has succeeded.
    pub fn is_populated(&self) -> bool {
        self.generation > 0
    }
}
