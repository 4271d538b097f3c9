//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task store contract (create/list/complete/delete) to Dart.
//! - Own the process connection and the list snapshot rendered by screens.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One connection per process, opened on `init_store` or first use.
//! - Every successful mutation is followed by a full list refresh.

use log::{info, warn};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tasklist_core::db::open_db;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_task_id,
    ping as ping_inner, ListCache, SqliteTaskRepository, Task, TaskDraft, TaskError, TaskService,
};

const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";
const DB_PATH_ENV: &str = "TASKLIST_DB_PATH";

static SESSION: Mutex<Option<TaskSession>> = Mutex::new(None);

struct TaskSession {
    db_path: PathBuf,
    conn: Connection,
    cache: ListCache,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the task database at `db_path` and loads the initial lists.
///
/// # FFI contract
/// - Idempotent for the same path.
/// - Switching to another path once a store is open is rejected.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);

    let mut guard = lock_session();
    if let Some(session) = guard.as_ref() {
        if session.db_path == requested {
            return String::new();
        }
        return format!(
            "store already open at `{}`; refusing to switch to `{}`",
            session.db_path.display(),
            requested.display()
        );
    }

    match open_session(requested) {
        Ok(session) => {
            *guard = Some(session);
            String::new()
        }
        Err(message) => message,
    }
}

/// Task row as rendered by list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Canonical date string, e.g. `Mon Jan 01 2024`.
    pub start_date: String,
    pub end_date: String,
    pub completed: bool,
}

/// List envelope returned by list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Both lists after an explicit refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshotResponse {
    pub ok: bool,
    pub pending: Vec<TaskItem>,
    pub completed: Vec<TaskItem>,
    pub message: String,
}

/// Result envelope for mutating calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    pub task_id: Option<String>,
    /// `validation` or `persistence` on failure.
    pub error_kind: Option<String>,
    /// Field-specific message for validation failures, generic otherwise.
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            error_kind: None,
            message: message.into(),
        }
    }

    fn failure(err: &TaskError) -> Self {
        let (kind, message) = match err {
            TaskError::Validation(validation) => ("validation", validation.message.clone()),
            TaskError::Persistence(_) => (
                "persistence",
                "Could not save your changes. Please try again.".to_string(),
            ),
        };
        Self {
            ok: false,
            task_id: None,
            error_kind: Some(kind.to_string()),
            message,
        }
    }

    fn unavailable(message: String) -> Self {
        Self {
            ok: false,
            task_id: None,
            error_kind: Some("persistence".to_string()),
            message,
        }
    }
}

/// Validates and inserts a task, then refreshes both lists.
///
/// `start_date` / `end_date` accept `Mon Jan 01 2024` or `2024-01-01`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(
    title: String,
    description: Option<String>,
    start_date: String,
    end_date: String,
) -> TaskActionResponse {
    let draft = TaskDraft {
        title,
        description,
        start_date,
        end_date,
    };
    mutate(|service| service.add_task(&draft).map(|task| Some(task.id)))
        .unwrap_or_else(TaskActionResponse::unavailable)
}

/// Marks a task completed, then refreshes both lists.
///
/// Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_complete(id: String) -> TaskActionResponse {
    mutate(|service| {
        let task_id = parse_task_id(&id)?;
        service.complete_task(task_id)?;
        Ok(Some(task_id))
    })
    .unwrap_or_else(TaskActionResponse::unavailable)
}

/// Deletes a task, then refreshes both lists.
///
/// Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskActionResponse {
    mutate(|service| {
        let task_id = parse_task_id(&id)?;
        service.delete_task(task_id)?;
        Ok(Some(task_id))
    })
    .unwrap_or_else(TaskActionResponse::unavailable)
}

/// Returns the cached pending list, loading it on first use.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_pending() -> TaskListResponse {
    read_list(ListCache::pending)
}

/// Returns the cached completed list, loading it on first use.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_completed() -> TaskListResponse {
    read_list(ListCache::completed)
}

/// Re-reads both lists from storage; called when a list screen gains focus.
#[flutter_rust_bridge::frb(sync)]
pub fn task_refresh() -> TaskSnapshotResponse {
    let result = with_session(|service, cache| {
        let refresh_error = service.refresh(cache).err();
        Ok((
            refresh_error,
            to_items(cache.pending()),
            to_items(cache.completed()),
        ))
    });

    match result {
        Ok(Ok((None, pending, completed))) => TaskSnapshotResponse {
            ok: true,
            pending,
            completed,
            message: String::new(),
        },
        // Stale lists are still returned so the screen keeps rendering.
        Ok(Ok((Some(err), pending, completed))) => TaskSnapshotResponse {
            ok: false,
            pending,
            completed,
            message: format!("task_refresh failed: {err}"),
        },
        Ok(Err(err)) => TaskSnapshotResponse {
            ok: false,
            pending: Vec::new(),
            completed: Vec::new(),
            message: format!("task_refresh failed: {err}"),
        },
        Err(message) => TaskSnapshotResponse {
            ok: false,
            pending: Vec::new(),
            completed: Vec::new(),
            message,
        },
    }
}

fn mutate(
    f: impl FnOnce(
        &TaskService<SqliteTaskRepository<'_>>,
    ) -> Result<Option<tasklist_core::TaskId>, TaskError>,
) -> Result<TaskActionResponse, String> {
    with_session(|service, cache| {
        let task_id = match f(service) {
            Ok(task_id) => task_id,
            Err(err) => return Ok(TaskActionResponse::failure(&err)),
        };

        if let Err(err) = service.refresh(cache) {
            warn!("event=list_refresh module=ffi status=error error={err}");
            return Ok(TaskActionResponse::success(
                "Saved, but the task list could not be reloaded.",
                task_id.map(|id| id.to_string()),
            ));
        }
        Ok(TaskActionResponse::success(
            "OK",
            task_id.map(|id| id.to_string()),
        ))
    })
    .map(|result: Result<TaskActionResponse, TaskError>| {
        result.unwrap_or_else(|err| TaskActionResponse::failure(&err))
    })
}

fn read_list(select: fn(&ListCache) -> &[Task]) -> TaskListResponse {
    let result = with_session(|service, cache| {
        if !cache.is_populated() {
            service.refresh(cache)?;
        }
        Ok(to_items(select(cache)))
    });

    match result {
        Ok(Ok(items)) => TaskListResponse {
            ok: true,
            items,
            message: String::new(),
        },
        Ok(Err(err)) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("task list failed: {err}"),
        },
        Err(message) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
    }
}

/// Runs `f` against the process session, opening the default store first
/// when `init_store` was never called.
///
/// The outer `Err` reports that no store could be opened.
fn with_session<T>(
    f: impl FnOnce(&TaskService<SqliteTaskRepository<'_>>, &mut ListCache) -> Result<T, TaskError>,
) -> Result<Result<T, TaskError>, String> {
    let mut guard = lock_session();
    if guard.is_none() {
        let fallback = resolve_default_db_path();
        warn!(
            "event=store_open module=ffi status=fallback path={} reason=init_store_not_called",
            fallback.display()
        );
        *guard = Some(open_session(fallback)?);
    }
    let Some(session) = guard.as_mut() else {
        return Err("task store unavailable".to_string());
    };

    let TaskSession { conn, cache, .. } = session;
    let repo = SqliteTaskRepository::try_new(conn)
        .map_err(|err| format!("task store init failed: {err}"))?;
    let service = TaskService::new(repo);
    Ok(f(&service, cache))
}

fn open_session(db_path: PathBuf) -> Result<TaskSession, String> {
    let conn = open_db(&db_path).map_err(|err| format!("task DB open failed: {err}"))?;
    let mut cache = ListCache::new();
    {
        let repo = SqliteTaskRepository::try_new(&conn)
            .map_err(|err| format!("task store init failed: {err}"))?;
        cache
            .refresh(&repo)
            .map_err(|err| format!("initial task load failed: {err}"))?;
    }

    info!(
        "event=store_open module=ffi status=ok pending={} completed={}",
        cache.pending().len(),
        cache.completed().len()
    );
    Ok(TaskSession {
        db_path,
        conn,
        cache,
    })
}

fn lock_session() -> MutexGuard<'static, Option<TaskSession>> {
    SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn resolve_default_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

fn to_items(tasks: &[Task]) -> Vec<TaskItem> {
    tasks.iter().map(to_item).collect()
}

fn to_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        start_date: task.start_date.to_canonical_string(),
        end_date: task.end_date.to_canonical_string(),
        completed: task.completed,
    }
}
