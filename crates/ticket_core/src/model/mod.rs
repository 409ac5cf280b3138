//! Domain model for the Project → Feature → Task hierarchy.
//!
//! # Responsibility
//! - Define the records handed to callers and the drafts they insert.
//! - Describe collections and their secondary indices.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - The hierarchy is strictly tree-shaped; parent keys never change.
//! - Deletion is physical; there are no tombstones.

pub mod collection;
pub mod feature;
pub mod project;
pub mod task;
pub mod validation;

pub use collection::{Collection, IndexName, IndexValue};
pub use feature::{Feature, FeatureStatus, NewFeature};
pub use project::{NewProject, Project, ProjectSummary};
pub use task::{NewTask, Task, TaskStatus};
pub use validation::RecordValidationError;

use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned row identifier. Monotonic and never reused.
pub type RecordId = i64;

/// Unix epoch milliseconds.
pub type EpochMillis = i64;

/// Current wall clock as epoch milliseconds.
pub fn now_epoch_ms() -> EpochMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as EpochMillis)
}
