//! Store and logging configuration.
//!
//! # Responsibility
//! - Describe where the ticket database lives and how connections behave.
//! - Resolve configuration from `TICKETS_*` environment variables with
//!   stable fallbacks.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - `:memory:` as database path selects an in-memory store.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_PATH_ENV: &str = "TICKETS_DB_PATH";
pub const BUSY_TIMEOUT_ENV: &str = "TICKETS_BUSY_TIMEOUT_MS";
pub const LOG_LEVEL_ENV: &str = "TICKETS_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TICKETS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tickets.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "tickets-logs";
/// Busy timeout used when none is configured.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const IN_MEMORY_MARKER: &str = ":memory:";

/// Physical location of the ticket database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// SQLite file; parent directories are created on open.
    File(PathBuf),
    /// Private in-memory database, gone when the store is dropped.
    Memory,
}

impl StoreLocation {
    /// Short label used in log lines.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Connection-level configuration for the ticket store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// How long SQLite waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// File-backed configuration with default connection settings.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: StoreLocation::File(path.as_ref().to_path_buf()),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// In-memory configuration with default connection settings.
    pub fn memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Builds configuration from the process environment.
    ///
    /// - `TICKETS_DB_PATH`: database file, or `:memory:`. Defaults to
    ///   `<temp dir>/tickets.sqlite3`.
    /// - `TICKETS_BUSY_TIMEOUT_MS`: busy timeout in milliseconds. Defaults to
    ///   5000; unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let location = match non_blank(lookup(DB_PATH_ENV)) {
            Some(raw) if raw == IN_MEMORY_MARKER => StoreLocation::Memory,
            Some(raw) => StoreLocation::File(PathBuf::from(raw)),
            None => StoreLocation::File(std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
        };
        let busy_timeout = non_blank(lookup(BUSY_TIMEOUT_ENV))
            .and_then(|raw| raw.parse::<u64>().ok())
            .map_or(DEFAULT_BUSY_TIMEOUT, Duration::from_millis);

        Self {
            location,
            busy_timeout,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Logging configuration consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl LogConfig {
    pub fn new(level: impl Into<String>, log_dir: impl AsRef<Path>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.as_ref().to_path_buf(),
        }
    }

    /// Builds configuration from `TICKETS_LOG_LEVEL` and `TICKETS_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level =
            non_blank(lookup(LOG_LEVEL_ENV)).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = non_blank(lookup(LOG_DIR_ENV))
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
        Self { level, log_dir }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
