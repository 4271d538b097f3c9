//! Task use-case service.
//!
//! # Responsibility
//! - Run the validated write path: validate, then persist.
//! - Offer the explicit refresh step that follows every mutation.
//!
//! # Invariants
//! - The store is never reached when validation fails.
//! - Mutations never refresh a `ListCache` implicitly; callers sequence
//!   `mutate` then `refresh`.

use crate::model::task::{Task, TaskId};
use crate::model::validation::{validate, TaskDraft, ValidationError};
use crate::repo::task_repo::{PersistenceError, TaskRepository};
use crate::service::list_cache::ListCache;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure kinds surfaced to the view layer.
#[derive(Debug)]
pub enum TaskError {
    /// Input rejected before reaching storage.
    Validation(ValidationError),
    /// Storage failed; the user must resubmit.
    Persistence(PersistenceError),
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for TaskError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for TaskError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Use-case service wrapper over a task repository.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates a draft and inserts it as a pending task.
    pub fn add_task(&self, draft: &TaskDraft) -> Result<Task, TaskError> {
        let valid = match validate(draft) {
            Ok(valid) => valid,
            Err(err) => {
                warn!(
                    "event=task_add module=service status=rejected field={}",
                    err.field.as_str()
                );
                return Err(err.into());
            }
        };

        let task = self.repo.create(&valid)?;
        info!(
            "event=task_add module=service status=ok task_id={}",
            task.id
        );
        Ok(task)
    }

    pub fn complete_task(&self, id: TaskId) -> Result<(), TaskError> {
        self.repo.complete(id)?;
        info!("event=task_complete module=service status=ok task_id={id}");
        Ok(())
    }

    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskError> {
        self.repo.delete(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    pub fn pending(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.repo.list_pending()?)
    }

    pub fn completed(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.repo.list_completed()?)
    }

    /// Replaces the cache with a fresh snapshot of both lists.
    pub fn refresh(&self, cache: &mut ListCache) -> Result<(), TaskError> {
        cache.refresh(&self.repo)?;
        Ok(())
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}
