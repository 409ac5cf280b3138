//! Task record: the leaf of the hierarchy.

use super::validation::{require_parent_id, require_title};
use super::{Collection, EpochMillis, RecordId, RecordValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Task completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// The other state; backs the checkbox toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Completed,
            Self::Completed => Self::Open,
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub feature_id: RecordId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created: EpochMillis,
    pub last_modified: EpochMillis,
}

impl Task {
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_fields(self.feature_id, &self.title)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub feature_id: RecordId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl NewTask {
    /// Draft with status `open`.
    pub fn new(
        feature_id: RecordId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            feature_id,
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Open,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_fields(self.feature_id, &self.title)
    }
}

fn validate_fields(feature_id: RecordId, title: &str) -> Result<(), RecordValidationError> {
    require_parent_id(Collection::Tasks, "feature_id", feature_id)?;
    require_title(Collection::Tasks, title)
}
