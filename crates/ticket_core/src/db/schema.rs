//! Schema readiness checks for connections opened outside `open_db`.

use super::migrations::{current_user_version, latest_version};
use super::{DbError, DbResult};
use crate::model::Collection;
use rusqlite::Connection;

const COMMON_COLUMNS: &[&str] = &["id", "title", "description", "created", "last_modified"];

/// Verifies that `conn` is migrated to the latest version and carries every
/// table and column the record store reads.
pub fn ensure_schema_ready(conn: &Connection) -> DbResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for collection in Collection::ALL {
        let table = collection.table_name();
        if !table_exists(conn, table)? {
            return Err(DbError::MissingRequiredTable(table));
        }

        let status = (collection != Collection::Projects).then_some("status");
        let required = COMMON_COLUMNS
            .iter()
            .copied()
            .chain(collection.parent_column())
            .chain(status);
        for column in required {
            if !table_has_column(conn, table, column)? {
                return Err(DbError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
