//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its completion state.
//! - Own the single canonical date serialization used in storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - Dates are always rendered with [`CANONICAL_DATE_FORMAT`]; mixing formats
//!   would break date-order comparisons across reads and writes.
//! - `completed` only moves from `false` to `true`.

use crate::model::validation::ValidTask;
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a task row.
pub type TaskId = Uuid;

/// Storage and display format for task dates, e.g. `Mon Jan 01 2024`.
pub const CANONICAL_DATE_FORMAT: &str = "%a %b %d %Y";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date attached to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskDate(NaiveDate);

impl TaskDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a date from year/month/day, returning `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parses canonical (`Mon Jan 01 2024`) or ISO (`2024-01-01`) input.
    ///
    /// The weekday of canonical input must agree with the date.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        NaiveDate::parse_from_str(trimmed, CANONICAL_DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
            .ok()
            .map(Self)
    }

    /// Parses only the storage representation (`Mon Jan 01 2024`), untrimmed.
    pub fn parse_canonical(value: &str) -> Option<Self> {
        NaiveDate::parse_from_str(value, CANONICAL_DATE_FORMAT)
            .ok()
            .map(Self)
    }

    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Renders the storage representation.
    pub fn to_canonical_string(&self) -> String {
        self.0.format(CANONICAL_DATE_FORMAT).to_string()
    }
}

impl Display for TaskDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_DATE_FORMAT))
    }
}

impl Serialize for TaskDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for TaskDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid task date `{raw}`")))
    }
}

/// Completion state, mirrored to the integer `completed` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Stored as `0`.
    Pending,
    /// Stored as `1`.
    Completed,
}

impl TaskStatus {
    pub fn as_flag(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Completed => 1,
        }
    }

    pub fn from_flag(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Trimmed, never empty.
    pub title: String,
    /// `None` when the user left the description blank.
    pub description: Option<String>,
    pub start_date: TaskDate,
    /// Never earlier than `start_date` at creation time.
    pub end_date: TaskDate,
    pub completed: bool,
}

impl Task {
    /// Creates a pending task with a freshly generated id.
    pub fn new(valid: ValidTask) -> Self {
        Self::with_id(Uuid::new_v4(), valid)
    }

    /// Creates a pending task with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: TaskId, valid: ValidTask) -> Self {
        let (title, description, start_date, end_date) = valid.into_parts();
        Self {
            id,
            title,
            description,
            start_date,
            end_date,
            completed: false,
        }
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }
}
