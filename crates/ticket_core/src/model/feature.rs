//! Feature record and its open-ended status.
//!
//! # Invariants
//! - `project_id` references a live project at creation and never changes.
//! - Status is `open`, `completed`, or any non-blank caller label.

use super::validation::{require_parent_id, require_title};
use super::{Collection, EpochMillis, RecordId, RecordValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Feature lifecycle label.
///
/// Serialized as its plain string form. Equality and hashing compare labels,
/// so `Custom("open")` equals `Open`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeatureStatus {
    #[default]
    Open,
    Completed,
    /// Caller-defined label, stored verbatim.
    Custom(String),
}

impl FeatureStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Completed => "completed",
            Self::Custom(label) => label.as_str(),
        }
    }

    /// Maps a stored label back to a status. Known labels win over `Custom`.
    pub fn parse(value: &str) -> Self {
        match value {
            "open" => Self::Open,
            "completed" => Self::Completed,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl Display for FeatureStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for FeatureStatus {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for FeatureStatus {}

impl Hash for FeatureStatus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<String> for FeatureStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FeatureStatus> for String {
    fn from(value: FeatureStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Stored feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: RecordId,
    pub project_id: RecordId,
    pub title: String,
    pub description: String,
    pub status: FeatureStatus,
    pub created: EpochMillis,
    pub last_modified: EpochMillis,
}

impl Feature {
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_fields(self.project_id, &self.title, &self.status)
    }
}

/// Caller-supplied fields for a new feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeature {
    pub project_id: RecordId,
    pub title: String,
    pub description: String,
    pub status: FeatureStatus,
}

impl NewFeature {
    /// Draft with status `open`.
    pub fn new(
        project_id: RecordId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: description.into(),
            status: FeatureStatus::Open,
        }
    }

    pub fn with_status(mut self, status: FeatureStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        validate_fields(self.project_id, &self.title, &self.status)
    }
}

fn validate_fields(
    project_id: RecordId,
    title: &str,
    status: &FeatureStatus,
) -> Result<(), RecordValidationError> {
    require_parent_id(Collection::Features, "project_id", project_id)?;
    require_title(Collection::Features, title)?;
    if status.as_str().trim().is_empty() {
        return Err(RecordValidationError::EmptyStatus);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{FeatureStatus, NewFeature};
    use crate::model::RecordValidationError;
    use std::collections::HashSet;

    #[test]
    fn status_parse_prefers_known_labels() {
        assert_eq!(FeatureStatus::parse("open"), FeatureStatus::Open);
        assert_eq!(FeatureStatus::parse("completed"), FeatureStatus::Completed);
        assert_eq!(
            FeatureStatus::parse("blocked"),
            FeatureStatus::Custom("blocked".to_string())
        );
        assert_eq!(FeatureStatus::Custom("blocked".into()).as_str(), "blocked");
    }

    #[test]
    fn custom_known_label_equals_its_variant() {
        let spelled = FeatureStatus::Custom("open".to_string());
        assert_eq!(spelled, FeatureStatus::Open);
        assert_ne!(spelled, FeatureStatus::Completed);

        let labels: HashSet<FeatureStatus> =
            [spelled, FeatureStatus::Open, FeatureStatus::parse("open")].into();
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn draft_validation_checks_parent_title_and_status() {
        assert!(NewFeature::new(1, "Login", "").validate().is_ok());
        assert!(matches!(
            NewFeature::new(0, "Login", "").validate(),
            Err(RecordValidationError::InvalidParentId { value: 0, .. })
        ));
        assert!(matches!(
            NewFeature::new(1, "  ", "").validate(),
            Err(RecordValidationError::EmptyTitle(_))
        ));
        assert_eq!(
            NewFeature::new(1, "Login", "")
                .with_status(FeatureStatus::Custom(" ".into()))
                .validate(),
            Err(RecordValidationError::EmptyStatus)
        );
    }
}
