//! Core of the Project → Feature → Task tracker.
//!
//! Persistence lives in an embedded SQLite database reached through one
//! async [`Store`] handle; [`TicketService`] is the typed API presentation
//! code calls, and [`navigation`] maps location paths to screens.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{LogConfig, StoreConfig, StoreLocation};
pub use db::DbError;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{
    Collection, EpochMillis, Feature, FeatureStatus, IndexName, IndexValue, NewFeature,
    NewProject, NewTask, Project, ProjectSummary, RecordId, RecordValidationError, Task,
    TaskStatus,
};
pub use navigation::{resolve_screen, Route, Screen};
pub use repo::{CascadeReport, RepoError};
pub use service::TicketService;
pub use store::{shared_store, Store, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
