use rusqlite::Connection;
use ticket_core::db::migrations::latest_version;
use ticket_core::db::{ensure_schema_ready, open_db, open_db_in_memory, DbError};
use ticket_core::{Store, StoreConfig, StoreError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["projects", "features", "tasks"] {
        assert_table_exists(&conn, table);
    }
    for index in [
        "idx_features_project_id",
        "idx_features_status",
        "idx_features_created",
        "idx_tasks_feature_id",
        "idx_tasks_status",
        "idx_tasks_created",
    ] {
        assert_index_exists(&conn, index);
    }
    ensure_schema_ready(&conn).unwrap();
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("nested").join("tickets.sqlite3"));

    let conn_first = open_db(&config).unwrap();
    conn_first
        .execute(
            "INSERT INTO projects (title, description, created, last_modified)
             VALUES ('Website', '', 1, 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&config).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM projects;", [], |row| row.get(0))
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

    let err = open_db(&StoreConfig::file(&path)).unwrap_err();
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

#[tokio::test]
async fn store_open_reports_newer_schema_as_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 42;")
        .unwrap();

    let err = Store::open(StoreConfig::file(&path)).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::StoreUnavailable(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn from_connection_rejects_unmigrated_database() {
    let conn = Connection::open_in_memory().unwrap();
    let err = Store::from_connection(conn).unwrap_err();
    assert!(matches!(
        err,
        StoreError::StoreUnavailable(DbError::UninitializedConnection { .. })
    ));
}

#[test]
fn schema_check_reports_missing_table() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE tasks;").unwrap();
    let err = ensure_schema_ready(&conn).unwrap_err();
    assert!(matches!(err, DbError::MissingRequiredTable("tasks")));
}

#[test]
fn foreign_keys_are_enforced_at_commit() {
    let mut conn = open_db_in_memory().unwrap();
    let tx = conn.transaction().unwrap();
    tx.execute(
        "INSERT INTO tasks (feature_id, title, description, status, created, last_modified)
         VALUES (77, 'Orphan', '', 'open', 1, 1);",
        [],
    )
    .unwrap();
    assert!(tx.commit().is_err());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
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
