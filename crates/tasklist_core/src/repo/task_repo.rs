//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/complete/delete over the `todos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every operation is a single SQL statement, so it is atomic on its own.
//! - `complete` and `delete` on an unknown id succeed without touching rows.
//! - Read paths reject malformed persisted rows instead of masking them.
//! - Lists are ordered by insertion (`rowid ASC`).

use crate::db::migrations::{current_user_version, latest_version, TODOS_COLUMNS, TODOS_TABLE};
use crate::db::DbError;
use crate::model::task::{Task, TaskDate, TaskId, TaskStatus};
use crate::model::validation::ValidTask;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    startDate,
    endDate,
    completed
FROM todos";

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage-level failure of a task store operation.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence gateway for task rows.
pub trait TaskRepository {
    /// Inserts a new pending task under a freshly generated id.
    fn create(&self, task: &ValidTask) -> PersistenceResult<Task>;
    /// Inserts a new pending task under a caller-provided id.
    fn create_with_id(&self, id: TaskId, task: &ValidTask) -> PersistenceResult<Task>;
    fn get(&self, id: TaskId) -> PersistenceResult<Option<Task>>;
    fn list_pending(&self) -> PersistenceResult<Vec<Task>>;
    fn list_completed(&self) -> PersistenceResult<Vec<Task>>;
    fn count(&self) -> PersistenceResult<u64>;
    /// Marks a task completed. Unknown ids are a no-op.
    fn complete(&self, id: TaskId) -> PersistenceResult<()>;
    /// Removes a task. Unknown ids are a no-op.
    fn delete(&self, id: TaskId) -> PersistenceResult<()>;
}

/// SQLite-backed task repository borrowing the process connection.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection after checking that the task schema is in place.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `ensure_schema` has not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match the positional insert contract.
    pub fn try_new(conn: &'conn Connection) -> PersistenceResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(PersistenceError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(conn, TODOS_TABLE)?;
        if columns.is_empty() {
            return Err(PersistenceError::MissingRequiredTable(TODOS_TABLE));
        }
        for &column in TODOS_COLUMNS {
            if !columns.iter().any(|existing| existing == column) {
                return Err(PersistenceError::MissingRequiredColumn {
                    table: TODOS_TABLE,
                    column,
                });
            }
        }

        Ok(Self { conn })
    }

    /// Writes one row using the positional column order of the table.
    fn insert(&self, record: Task) -> PersistenceResult<Task> {
        let inserted = self.conn.execute(
            "INSERT INTO todos VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.id.to_string(),
                record.title.as_str(),
                record.description.as_deref(),
                record.start_date.to_canonical_string(),
                record.end_date.to_canonical_string(),
                record.status().as_flag(),
            ],
        );

        if let Err(err) = inserted {
            error!(
                "event=task_create module=repo status=error task_id={} error={}",
                record.id, err
            );
            return Err(err.into());
        }

        debug!(
            "event=task_create module=repo status=ok task_id={}",
            record.id
        );
        Ok(record)
    }

    fn list_by_status(&self, status: TaskStatus) -> PersistenceResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE completed = ?1
             ORDER BY rowid ASC;"
        ))?;

        let mut rows = stmt.query([status.as_flag()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        debug!(
            "event=task_list module=repo status=ok filter={:?} count={}",
            status,
            tasks.len()
        );
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create(&self, task: &ValidTask) -> PersistenceResult<Task> {
        self.insert(Task::new(task.clone()))
    }

    fn create_with_id(&self, id: TaskId, task: &ValidTask) -> PersistenceResult<Task> {
        self.insert(Task::with_id(id, task.clone()))
    }

    fn get(&self, id: TaskId) -> PersistenceResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_pending(&self) -> PersistenceResult<Vec<Task>> {
        self.list_by_status(TaskStatus::Pending)
    }

    fn list_completed(&self) -> PersistenceResult<Vec<Task>> {
        self.list_by_status(TaskStatus::Completed)
    }

    fn count(&self) -> PersistenceResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| PersistenceError::InvalidData(format!("negative row count {count}")))
    }

    fn complete(&self, id: TaskId) -> PersistenceResult<()> {
        let changed = self.conn.execute(
            "UPDATE todos SET completed = ?1 WHERE id = ?2;",
            params![TaskStatus::Completed.as_flag(), id.to_string()],
        )?;

        debug!(
            "event=task_complete module=repo status=ok task_id={} matched={}",
            id, changed
        );
        Ok(())
    }

    fn delete(&self, id: TaskId) -> PersistenceResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id.to_string()])?;

        debug!(
            "event=task_delete module=repo status=ok task_id={} matched={}",
            id, changed
        );
        Ok(())
    }
}

fn table_columns(conn: &Connection, table: &str) -> PersistenceResult<Vec<String>> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |_| Ok(()),
        )
        .optional()?;
    if exists.is_none() {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn parse_task_row(row: &Row<'_>) -> PersistenceResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| PersistenceError::InvalidData(format!("invalid id `{id_text}` in todos.id")))?;

    let start_date = parse_date_column(row, "startDate")?;
    let end_date = parse_date_column(row, "endDate")?;

    let flag: i64 = row.get("completed")?;
    let status = TaskStatus::from_flag(flag).ok_or_else(|| {
        PersistenceError::InvalidData(format!("invalid completed value `{flag}` in todos.completed"))
    })?;

    Ok(Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        start_date,
        end_date,
        completed: status == TaskStatus::Completed,
    })
}

fn parse_date_column(row: &Row<'_>, column: &'static str) -> PersistenceResult<TaskDate> {
    let raw: String = row.get(column)?;
    TaskDate::parse_canonical(&raw).ok_or_else(|| {
        PersistenceError::InvalidData(format!("invalid date `{raw}` in todos.{column}"))
    })
}
