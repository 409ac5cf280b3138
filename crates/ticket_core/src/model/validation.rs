//! Field-level validation shared by all record kinds.

use super::{Collection, RecordId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A record or draft that must not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Title is empty after trim.
    EmptyTitle(Collection),
    /// Parent key is not a valid store identifier.
    InvalidParentId {
        collection: Collection,
        field: &'static str,
        value: RecordId,
    },
    /// Caller-defined feature status label is empty after trim.
    EmptyStatus,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle(collection) => {
                write!(f, "{collection} title must not be blank")
            }
            Self::InvalidParentId {
                collection,
                field,
                value,
            } => write!(f, "{collection}.{field} must be a positive id, got {value}"),
            Self::EmptyStatus => write!(f, "feature status must not be blank"),
        }
    }
}

impl Error for RecordValidationError {}

pub(crate) fn require_title(
    collection: Collection,
    title: &str,
) -> Result<(), RecordValidationError> {
    if title.trim().is_empty() {
        return Err(RecordValidationError::EmptyTitle(collection));
    }
    Ok(())
}

pub(crate) fn require_parent_id(
    collection: Collection,
    field: &'static str,
    value: RecordId,
) -> Result<(), RecordValidationError> {
    if value <= 0 {
        return Err(RecordValidationError::InvalidParentId {
            collection,
            field,
            value,
        });
    }
    Ok(())
}
