//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::DbResult;
use crate::config::{StoreConfig, StoreLocation};
use log::{error, info};
use rusqlite::Connection;
use std::time::{Duration, Instant};

/// Opens the database described by `config` and applies pending migrations.
///
/// # Side effects
/// - Creates the parent directory of a file database when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = config.location.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect(&config.location).and_then(|mut conn| {
        bootstrap_connection(&mut conn, config.busy_timeout)?;
        Ok(conn)
    });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// Opens an in-memory database with default settings and applies migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_db(&StoreConfig::memory())
}

fn connect(location: &StoreLocation) -> DbResult<Connection> {
    match location {
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Ok(Connection::open(path)?)
        }
        StoreLocation::Memory => Ok(Connection::open_in_memory()?),
    }
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)?;
    Ok(())
}
