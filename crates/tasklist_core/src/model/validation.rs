//! Task payload validation.
//!
//! # Responsibility
//! - Turn raw form input into a normalized `ValidTask`.
//! - Report the first offending field with a human-readable message.
//!
//! # Invariants
//! - Checks run in a fixed order: title, description, start date, end date,
//!   date order. The first failure is returned; errors are not aggregated.
//! - Validation is pure: no I/O, deterministic for a given input.

use crate::model::task::{TaskDate, TaskId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Raw candidate submitted by the add-task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    /// Canonical (`Mon Jan 01 2024`) or ISO (`2024-01-01`) date string.
    pub start_date: String,
    pub end_date: String,
}

impl TaskDraft {
    pub fn new(
        title: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Normalized payload that passed every check and is ready for persistence.
///
/// Fields are private so that a value can only come out of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTask {
    title: String,
    description: Option<String>,
    start_date: TaskDate,
    end_date: TaskDate,
}

impl ValidTask {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn start_date(&self) -> TaskDate {
        self.start_date
    }

    pub fn end_date(&self) -> TaskDate {
        self.end_date
    }

    pub(crate) fn into_parts(self) -> (String, Option<String>, TaskDate, TaskDate) {
        (self.title, self.description, self.start_date, self.end_date)
    }
}

/// Input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationField {
    Id,
    Title,
    StartDate,
    EndDate,
    /// Both dates parsed, but start is after end.
    DateRange,
}

impl ValidationField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::DateRange => "date_range",
        }
    }
}

/// First failed check of a candidate task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: ValidationField,
    pub message: String,
}

impl ValidationError {
    fn new(field: ValidationField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ValidationError {}

/// Validates and normalizes a candidate task.
///
/// # Errors
/// - `Title` when the title is empty after trimming.
/// - `StartDate` / `EndDate` when a date does not parse.
/// - `DateRange` when the start date is after the end date.
pub fn validate(candidate: &TaskDraft) -> Result<ValidTask, ValidationError> {
    let title = candidate.title.trim();
    if title.is_empty() {
        return Err(ValidationError::new(
            ValidationField::Title,
            "Title is required",
        ));
    }

    let description = candidate
        .description
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned);

    let start_date = TaskDate::parse(&candidate.start_date).ok_or_else(|| {
        ValidationError::new(
            ValidationField::StartDate,
            format!("Start Date is not a valid date: `{}`", candidate.start_date),
        )
    })?;
    let end_date = TaskDate::parse(&candidate.end_date).ok_or_else(|| {
        ValidationError::new(
            ValidationField::EndDate,
            format!("End Date is not a valid date: `{}`", candidate.end_date),
        )
    })?;

    if start_date > end_date {
        return Err(ValidationError::new(
            ValidationField::DateRange,
            "Start Date cannot be greater than End Date",
        ));
    }

    Ok(ValidTask {
        title: title.to_owned(),
        description,
        start_date,
        end_date,
    })
}

/// Parses a task id received from the view layer.
pub fn parse_task_id(value: &str) -> Result<TaskId, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        ValidationError::new(ValidationField::Id, format!("invalid task id `{value}`"))
    })
}
