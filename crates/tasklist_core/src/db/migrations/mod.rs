//! SQLite schema registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Create the `todos` table idempotently on every application start.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Every migration statement uses `IF NOT EXISTS` semantics, so replaying
//!   a migration against a partially initialized file is harmless.
//! - Applied migration version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_todos.sql"),
}];

/// Name of the single table owned by the task store.
pub const TODOS_TABLE: &str = "todos";

/// Columns of [`TODOS_TABLE`], in positional insert order.
pub const TODOS_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "startDate",
    "endDate",
    "completed",
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Creates the task schema if absent.
///
/// Safe to call on every start. Returns an error when the database was
/// written by a newer binary or when a migration statement fails; callers
/// treat both as fatal.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        error!(
            "event=ensure_schema module=db status=error error_code=unsupported_schema db_version={} latest_supported={}",
            current_version, latest
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=ensure_schema module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

/// Reads the schema version mirrored in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
