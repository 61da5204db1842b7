use profession_core::db::migrations::latest_version;
use profession_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "profession");
    assert_index_exists(&conn, "idx_profession_name_lower");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profession.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO profession (name) VALUES ('Architect');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM profession;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
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
fn name_index_enforces_case_insensitive_uniqueness() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO profession (name) VALUES ('Engineer');", [])
        .unwrap();

    let err = conn
        .execute("INSERT INTO profession (name) VALUES ('engineer');", [])
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn name_index_folds_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO profession (name) VALUES ('Übersetzer');", [])
        .unwrap();

    let err = conn
        .execute("INSERT INTO profession (name) VALUES ('üBERSETZER');", [])
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert!(
        sqlite_object_exists(conn, "table", table_name),
        "table {table_name} does not exist"
    );
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert!(
        sqlite_object_exists(conn, "index", index_name),
        "index {index_name} does not exist"
    );
}

fn sqlite_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}
