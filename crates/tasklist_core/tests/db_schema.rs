use tasklist_core::db::migrations::{latest_version, TODOS_COLUMNS};
use tasklist_core::db::{ensure_schema, open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_todos_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(column_names(&conn, "todos"), TODOS_COLUMNS);
}

#[test]
fn ensure_schema_is_idempotent_on_same_connection() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todos VALUES ('00000000-0000-4000-8000-000000000001', 't', NULL, 'Mon Jan 01 2024', 'Mon Jan 01 2024', 0);",
        [],
    )
    .unwrap();

    ensure_schema(&mut conn).unwrap();
    ensure_schema(&mut conn).unwrap();

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn ensure_schema_adopts_table_created_outside_migrations() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS todos (
            id TEXT PRIMARY KEY,
            title TEXT,
            description TEXT,
            startDate TEXT,
            endDate TEXT,
            completed INTEGER
        );",
    )
    .unwrap();

    ensure_schema(&mut conn).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn reopening_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasklist.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO todos VALUES ('00000000-0000-4000-8000-000000000002', 't', 'd', 'Mon Jan 01 2024', 'Tue Jan 02 2024', 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let rows: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_unreachable_path_reports_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tasklist.db");

    match open_db(&path).unwrap_err() {
        DbError::Open { location, .. } => assert!(location.ends_with("tasklist.db")),
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}
