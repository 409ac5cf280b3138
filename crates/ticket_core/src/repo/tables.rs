//! Row mapping for the `projects`, `features` and `tasks` tables.

use crate::model::{
    Collection, EpochMillis, Feature, FeatureStatus, NewFeature, NewProject, NewTask, Project,
    RecordId, RecordValidationError, Task, TaskStatus,
};
use crate::repo::cascade::{delete_feature_cascade, delete_project_cascade, CascadeReport};
use crate::repo::record_repo::{delete_row, Record, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

impl Record for Project {
    type Draft = NewProject;

    const COLLECTION: Collection = Collection::Projects;
    const SELECT_SQL: &'static str = "SELECT
    id,
    title,
    description,
    created,
    last_modified
FROM projects";

    fn id(&self) -> RecordId {
        self.id
    }

    fn last_modified(&self) -> EpochMillis {
        self.last_modified
    }

    fn parent_id(&self) -> Option<RecordId> {
        None
    }

    fn draft_parent_id(_draft: &NewProject) -> Option<RecordId> {
        None
    }

    fn validate_record(&self) -> Result<(), RecordValidationError> {
        self.validate()
    }

    fn validate_draft(draft: &NewProject) -> Result<(), RecordValidationError> {
        draft.validate()
    }

    fn insert_row(conn: &Connection, draft: &NewProject, now: EpochMillis) -> RepoResult<RecordId> {
        conn.execute(
            "INSERT INTO projects (title, description, created, last_modified)
             VALUES (?1, ?2, ?3, ?3);",
            params![draft.title.as_str(), draft.description.as_str(), now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(conn: &Connection, record: &Self, now: EpochMillis) -> RepoResult<usize> {
        let changed = conn.execute(
            "UPDATE projects
             SET title = ?1,
                 description = ?2,
                 last_modified = ?3
             WHERE id = ?4;",
            params![
                record.title.as_str(),
                record.description.as_str(),
                now,
                record.id
            ],
        )?;
        Ok(changed)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let project = Project {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            created: row.get("created")?,
            last_modified: row.get("last_modified")?,
        };
        project.validate().map_err(invalid_persisted)?;
        Ok(project)
    }

    fn remove(conn: &Connection, id: RecordId) -> RepoResult<CascadeReport> {
        delete_project_cascade(conn, id)
    }
}

impl Record for Feature {
    type Draft = NewFeature;

    const COLLECTION: Collection = Collection::Features;
    const SELECT_SQL: &'static str = "SELECT
    id,
    project_id,
    title,
    description,
    status,
    created,
    last_modified
FROM features";

    fn id(&self) -> RecordId {
        self.id
    }

    fn last_modified(&self) -> EpochMillis {
        self.last_modified
    }

    fn parent_id(&self) -> Option<RecordId> {
        Some(self.project_id)
    }

    fn draft_parent_id(draft: &NewFeature) -> Option<RecordId> {
        Some(draft.project_id)
    }

    fn validate_record(&self) -> Result<(), RecordValidationError> {
        self.validate()
    }

    fn validate_draft(draft: &NewFeature) -> Result<(), RecordValidationError> {
        draft.validate()
    }

    fn insert_row(conn: &Connection, draft: &NewFeature, now: EpochMillis) -> RepoResult<RecordId> {
        conn.execute(
            "INSERT INTO features (project_id, title, description, status, created, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
            params![
                draft.project_id,
                draft.title.as_str(),
                draft.description.as_str(),
                draft.status.as_str(),
                now
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(conn: &Connection, record: &Self, now: EpochMillis) -> RepoResult<usize> {
        let changed = conn.execute(
            "UPDATE features
             SET title = ?1,
                 description = ?2,
                 status = ?3,
                 last_modified = ?4
             WHERE id = ?5;",
            params![
                record.title.as_str(),
                record.description.as_str(),
                record.status.as_str(),
                now,
                record.id
            ],
        )?;
        Ok(changed)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let status: String = row.get("status")?;
        let feature = Feature {
            id: row.get("id")?,
            project_id: row.get("project_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            status: FeatureStatus::parse(&status),
            created: row.get("created")?,
            last_modified: row.get("last_modified")?,
        };
        feature.validate().map_err(invalid_persisted)?;
        Ok(feature)
    }

    fn remove(conn: &Connection, id: RecordId) -> RepoResult<CascadeReport> {
        delete_feature_cascade(conn, id)
    }
}

impl Record for Task {
    type Draft = NewTask;

    const COLLECTION: Collection = Collection::Tasks;
    const SELECT_SQL: &'static str = "SELECT
    id,
    feature_id,
    title,
    description,
    status,
    created,
    last_modified
FROM tasks";

    fn id(&self) -> RecordId {
        self.id
    }

    fn last_modified(&self) -> EpochMillis {
        self.last_modified
    }

    fn parent_id(&self) -> Option<RecordId> {
        Some(self.feature_id)
    }

    fn draft_parent_id(draft: &NewTask) -> Option<RecordId> {
        Some(draft.feature_id)
    }

    fn validate_record(&self) -> Result<(), RecordValidationError> {
        self.validate()
    }

    fn validate_draft(draft: &NewTask) -> Result<(), RecordValidationError> {
        draft.validate()
    }

    fn insert_row(conn: &Connection, draft: &NewTask, now: EpochMillis) -> RepoResult<RecordId> {
        conn.execute(
            "INSERT INTO tasks (feature_id, title, description, status, created, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
            params![
                draft.feature_id,
                draft.title.as_str(),
                draft.description.as_str(),
                draft.status.as_str(),
                now
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_row(conn: &Connection, record: &Self, now: EpochMillis) -> RepoResult<usize> {
        let changed = conn.execute(
            "UPDATE tasks
             SET title = ?1,
                 description = ?2,
                 status = ?3,
                 last_modified = ?4
             WHERE id = ?5;",
            params![
                record.title.as_str(),
                record.description.as_str(),
                record.status.as_str(),
                now,
                record.id
            ],
        )?;
        Ok(changed)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let status_text: String = row.get("status")?;
        let status = TaskStatus::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
        })?;
        let task = Task {
            id: row.get("id")?,
            feature_id: row.get("feature_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            status,
            created: row.get("created")?,
            last_modified: row.get("last_modified")?,
        };
        task.validate().map_err(invalid_persisted)?;
        Ok(task)
    }

    fn remove(conn: &Connection, id: RecordId) -> RepoResult<CascadeReport> {
        let removed = delete_row(conn, Collection::Tasks, id)?;
        Ok(CascadeReport {
            tasks: usize::from(removed),
            ..CascadeReport::default()
        })
    }
}

fn invalid_persisted(err: RecordValidationError) -> RepoError {
    RepoError::InvalidData(err.to_string())
}
