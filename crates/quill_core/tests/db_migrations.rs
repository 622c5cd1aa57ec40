use quill_core::db::migrations::latest_version;
use quill_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "authors");
    assert_table_exists(&conn, "posts");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quill.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO authors (name, phone_number) VALUES ('Jane', '5551234567');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

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
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("quill").join("quill.sqlite3");

    let conn = open_db(&path).unwrap();

    assert!(path.is_file());
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn open_db_reports_parent_that_cannot_be_created() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let path = blocker.join("quill.sqlite3");

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::CreateDirectory { path: parent, .. } => assert_eq!(parent, blocker),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_defaults_fill_both_timestamps() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO posts (title) VALUES ('Top Picks');", [])
        .unwrap();

    let (created_at, updated_at): (i64, i64) = conn
        .query_row("SELECT created_at, updated_at FROM posts;", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert!(created_at > 0);
    assert_eq!(created_at, updated_at);
}

#[test]
fn author_name_uniqueness_ignores_ascii_case_at_storage_level() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO authors (name, phone_number) VALUES ('Jane', '5551234567');",
        [],
    )
    .unwrap();

    let err = conn
        .execute(
            "INSERT INTO authors (name, phone_number) VALUES ('JANE', '5559876543');",
            [],
        )
        .unwrap_err();
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            assert_eq!(failure.extended_code, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn post_category_is_constrained_at_storage_level() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute(
        "INSERT INTO posts (title, category) VALUES ('Top Picks', 'Sci-Fi');",
        [],
    );
    assert!(result.is_err());

    conn.execute(
        "INSERT INTO posts (title, category) VALUES ('Top Picks', 'Non-Fiction');",
        [],
    )
    .unwrap();
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
