use crate::model::RecordId;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static PROJECT_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/project/(\d+)(?:/feature/(\d+))?/?$").expect("valid project path regex")
});
static LEGACY_FEATURE_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/feature/(\d+)/?$").expect("valid feature path regex"));

/// Ids encoded in a location path.
///
/// A `feature_id` without `project_id` only comes from the legacy
/// `/feature/{id}` path; the owning project is then derived on resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Route {
    pub project_id: Option<RecordId>,
    pub feature_id: Option<RecordId>,
}

impl Route {
    /// Project list.
    pub fn root() -> Self {
        Self::default()
    }

    /// Feature list of one project.
    pub fn project(project_id: RecordId) -> Self {
        Self {
            project_id: Some(project_id),
            feature_id: None,
        }
    }

    /// Task view of one feature.
    pub fn feature(project_id: RecordId, feature_id: RecordId) -> Self {
        Self {
            project_id: Some(project_id),
            feature_id: Some(feature_id),
        }
    }

    /// Parses a location path. Anything unrecognized is the root route.
    ///
    /// Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();

        if let Some(captures) = PROJECT_PATH_RE.captures(path) {
            let project_id = captures.get(1).and_then(|m| parse_id(m.as_str()));
            let feature_id = captures.get(2).map(|m| parse_id(m.as_str()));
            return match (project_id, feature_id) {
                (Some(project_id), None) => Self::project(project_id),
                (Some(project_id), Some(Some(feature_id))) => Self::feature(project_id, feature_id),
                _ => Self::root(),
            };
        }

        if let Some(captures) = LEGACY_FEATURE_PATH_RE.captures(path) {
            if let Some(feature_id) = captures.get(1).and_then(|m| parse_id(m.as_str())) {
                return Self {
                    project_id: None,
                    feature_id: Some(feature_id),
                };
            }
        }

        Self::root()
    }

    /// Canonical location path for this route.
    pub fn to_path(&self) -> String {
        match (self.project_id, self.feature_id) {
            (Some(project_id), Some(feature_id)) => {
                format!("/project/{project_id}/feature/{feature_id}")
            }
            (Some(project_id), None) => format!("/project/{project_id}"),
            (None, Some(feature_id)) => format!("/feature/{feature_id}"),
            (None, None) => "/".to_string(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.project_id.is_none() && self.feature_id.is_none()
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Digits that overflow `RecordId` cannot name a stored record.
fn parse_id(raw: &str) -> Option<RecordId> {
    raw.parse::<RecordId>().ok()
}
