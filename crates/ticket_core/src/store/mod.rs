//! Async store handle over the synchronous repository layer.
//!
//! # Responsibility
//! - Own the single SQLite connection and share it between callers.
//! - Run every operation as one atomic transaction off the async runtime.
//! - Translate repository failures into the public error taxonomy.
//!
//! # Invariants
//! - Only this module opens transactions.
//! - An operation either commits completely or leaves no trace.
//! - Each future resolves exactly once; there are no retries.

use crate::db::DbError;
use crate::model::{Collection, RecordId};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod handle;
mod shared;

pub use handle::Store;
pub use shared::shared_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation as seen by callers.
#[derive(Debug)]
pub enum StoreError {
    /// Database could not be opened or bootstrapped. Fatal; surface it.
    StoreUnavailable(DbError),
    /// Target record does not exist.
    NotFound {
        collection: Collection,
        id: RecordId,
    },
    /// Input rejected before any write.
    ConstraintViolation(RepoError),
    /// Transaction rolled back; nothing of the operation was applied.
    TransactionAborted {
        operation: &'static str,
        source: RepoError,
    },
    /// Blocking worker died before reporting a result.
    Worker(String),
    /// The process-wide store failed to open; every caller sees that failure.
    SharedOpenFailed(Arc<StoreError>),
}

impl StoreError {
    pub(crate) fn from_repo(operation: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::NotFound { collection, id } => Self::NotFound { collection, id },
            err if err.is_constraint_violation() => Self::ConstraintViolation(err),
            source => Self::TransactionAborted { operation, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the store itself cannot be used.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::SharedOpenFailed(_))
    }

    /// Short stable label for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) | Self::SharedOpenFailed(_) => "store_unavailable",
            Self::NotFound { .. } => "not_found",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::TransactionAborted { .. } => "transaction_aborted",
            Self::Worker(_) => "worker_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(err) => write!(f, "ticket store unavailable: {err}"),
            Self::NotFound { collection, id } => write!(f, "record not found: {collection}/{id}"),
            Self::ConstraintViolation(err) => write!(f, "constraint violation: {err}"),
            Self::TransactionAborted { operation, source } => {
                write!(f, "{operation} aborted, no changes applied: {source}")
            }
            Self::Worker(message) => write!(f, "store worker failed: {message}"),
            Self::SharedOpenFailed(err) => write!(f, "shared store failed to open: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            Self::ConstraintViolation(err) => Some(err),
            Self::TransactionAborted { source, .. } => Some(source),
            Self::SharedOpenFailed(err) => Some(err.as_ref()),
            Self::NotFound { .. } | Self::Worker(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::StoreUnavailable(value)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreError;
    use crate::model::{Collection, IndexName, RecordValidationError};
    use crate::repo::RepoError;

    #[test]
    fn repo_errors_map_onto_taxonomy() {
        let not_found = StoreError::from_repo(
            "update",
            RepoError::NotFound {
                collection: Collection::Tasks,
                id: 9,
            },
        );
        assert!(not_found.is_not_found());

        let invalid = StoreError::from_repo(
            "add",
            RepoError::Validation(RecordValidationError::EmptyTitle(Collection::Projects)),
        );
        assert_eq!(invalid.code(), "constraint_violation");

        let index = StoreError::from_repo(
            "get_by_index",
            RepoError::UnsupportedIndex {
                collection: Collection::Projects,
                index: IndexName::Status,
            },
        );
        assert_eq!(index.code(), "constraint_violation");

        let aborted = StoreError::from_repo("delete", RepoError::InvalidData("bad".into()));
        assert_eq!(aborted.code(), "transaction_aborted");
        assert!(aborted.to_string().contains("no changes applied"));
    }
}
