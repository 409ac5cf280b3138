//! Project record: the root of the hierarchy.

use super::validation::require_title;
use super::{Collection, EpochMillis, RecordId, RecordValidationError};
use serde::{Deserialize, Serialize};

/// Stored project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub created: EpochMillis,
    pub last_modified: EpochMillis,
}

impl Project {
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_title(Collection::Projects, &self.title)
    }
}

/// Caller-supplied fields for a new project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
}

impl NewProject {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_title(Collection::Projects, &self.title)
    }
}

/// Counts shown next to a project in list screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: RecordId,
    pub features: usize,
    pub tasks: usize,
    pub completed_tasks: usize,
}

impl ProjectSummary {
    /// Share of completed tasks in `[0, 1]`; zero for a project without tasks.
    pub fn completion_ratio(&self) -> f64 {
        if self.tasks == 0 {
            return 0.0;
        }
        self.completed_tasks as f64 / self.tasks as f64
    }
}
