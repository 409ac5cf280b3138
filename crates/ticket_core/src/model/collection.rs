//! Collection and secondary-index catalog.

use super::{FeatureStatus, RecordId, TaskStatus};
use rusqlite::types::Value;
use std::fmt::{Display, Formatter};

/// Named record collection. Each maps to one SQLite table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Features,
    Tasks,
}

impl Collection {
    /// Root first, leaf last.
    pub const ALL: [Collection; 3] = [Self::Projects, Self::Features, Self::Tasks];

    pub fn table_name(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Features => "features",
            Self::Tasks => "tasks",
        }
    }

    /// Collection that owns rows of this one, if any.
    pub fn parent(self) -> Option<Collection> {
        match self {
            Self::Projects => None,
            Self::Features => Some(Self::Projects),
            Self::Tasks => Some(Self::Features),
        }
    }

    /// Column holding the parent key, if any.
    pub fn parent_column(self) -> Option<&'static str> {
        match self {
            Self::Projects => None,
            Self::Features => Some("project_id"),
            Self::Tasks => Some("feature_id"),
        }
    }

    /// Secondary indices defined for this collection.
    pub fn indices(self) -> &'static [IndexName] {
        match self {
            Self::Projects => &[],
            Self::Features => &[IndexName::ProjectId, IndexName::Status, IndexName::Created],
            Self::Tasks => &[IndexName::FeatureId, IndexName::Status, IndexName::Created],
        }
    }

    pub fn supports(self, index: IndexName) -> bool {
        self.indices().contains(&index)
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Secondary index name, spelled as callers see the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexName {
    ProjectId,
    FeatureId,
    Status,
    Created,
}

impl IndexName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectId => "projectId",
            Self::FeatureId => "featureId",
            Self::Status => "status",
            Self::Created => "created",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::ProjectId => "project_id",
            Self::FeatureId => "feature_id",
            Self::Status => "status",
            Self::Created => "created",
        }
    }

    /// Whether `value` has the kind stored in this index.
    pub fn accepts(self, value: &IndexValue) -> bool {
        match self {
            Self::ProjectId | Self::FeatureId | Self::Created => {
                matches!(value, IndexValue::Integer(_))
            }
            Self::Status => matches!(value, IndexValue::Text(_)),
        }
    }
}

impl Display for IndexName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup key for a secondary-index query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexValue {
    Integer(i64),
    Text(String),
}

impl IndexValue {
    pub(crate) fn to_sql_value(&self) -> Value {
        match self {
            Self::Integer(value) => Value::Integer(*value),
            Self::Text(value) => Value::Text(value.clone()),
        }
    }
}

impl Display for IndexValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "`{value}`"),
        }
    }
}

impl From<RecordId> for IndexValue {
    fn from(value: RecordId) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<TaskStatus> for IndexValue {
    fn from(value: TaskStatus) -> Self {
        Self::Text(value.as_str().to_string())
    }
}

impl From<&FeatureStatus> for IndexValue {
    fn from(value: &FeatureStatus) -> Self {
        Self::Text(value.as_str().to_string())
    }
}
