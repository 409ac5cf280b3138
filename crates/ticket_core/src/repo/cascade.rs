//! Cascading deletes across the project → feature → task hierarchy.
//!
//! # Responsibility
//! - Remove a parent row together with every descendant row.
//!
//! # Invariants
//! - Runs inside the caller's transaction; nothing here commits. The store
//!   commits once after the whole cascade, so no reader ever observes a
//!   feature without its project or a task without its feature.
//! - Children are found through the parent-key secondary index.
//! - Deleting an absent id is a successful no-op.
//! - Any error leaves the rollback decision to the caller.

use crate::model::{Collection, IndexName, IndexValue, RecordId};
use crate::repo::record_repo::{delete_row, list_ids_by_index, RepoResult};
use rusqlite::Connection;
use std::ops::AddAssign;

/// Number of rows removed per collection by one delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub projects: usize,
    pub features: usize,
    pub tasks: usize,
}

impl CascadeReport {
    pub fn total(&self) -> usize {
        self.projects + self.features + self.tasks
    }

    /// True when the delete found nothing to remove.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for CascadeReport {
    fn add_assign(&mut self, rhs: Self) {
        self.projects += rhs.projects;
        self.features += rhs.features;
        self.tasks += rhs.tasks;
    }
}

/// Deletes a feature and all of its tasks.
pub fn delete_feature_cascade(
    conn: &Connection,
    feature_id: RecordId,
) -> RepoResult<CascadeReport> {
    let mut report = CascadeReport::default();
    if delete_row(conn, Collection::Features, feature_id)? {
        report.features += 1;
    }

    let task_ids = list_ids_by_index(
        conn,
        Collection::Tasks,
        IndexName::FeatureId,
        &IndexValue::Integer(feature_id),
    )?;
    for task_id in task_ids {
        if delete_row(conn, Collection::Tasks, task_id)? {
            report.tasks += 1;
        }
    }

    Ok(report)
}

/// Deletes a project, all of its features and all of their tasks.
pub fn delete_project_cascade(
    conn: &Connection,
    project_id: RecordId,
) -> RepoResult<CascadeReport> {
    let mut report = CascadeReport::default();
    if delete_row(conn, Collection::Projects, project_id)? {
        report.projects += 1;
    }

    let feature_ids = list_ids_by_index(
        conn,
        Collection::Features,
        IndexName::ProjectId,
        &IndexValue::Integer(project_id),
    )?;
    for feature_id in feature_ids {
        report += delete_feature_cascade(conn, feature_id)?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{delete_feature_cascade, delete_project_cascade, CascadeReport};
    use crate::db::open_db_in_memory;
    use crate::model::{Collection, Feature, NewFeature, NewProject, NewTask, Project, Task};
    use crate::repo::record_repo::{get_record, insert_record, record_exists};

    #[test]
    fn project_cascade_counts_every_removed_row() {
        let mut conn = open_db_in_memory().unwrap();
        let tx = conn.transaction().unwrap();

        let project = insert_record::<Project>(&tx, &NewProject::new("Website", "")).unwrap();
        let login = insert_record::<Feature>(&tx, &NewFeature::new(project, "Login", "")).unwrap();
        let search =
            insert_record::<Feature>(&tx, &NewFeature::new(project, "Search", "")).unwrap();
        for title in ["Design form", "Wire backend"] {
            insert_record::<Task>(&tx, &NewTask::new(login, title, "")).unwrap();
        }
        insert_record::<Task>(&tx, &NewTask::new(search, "Index", "")).unwrap();

        let report = delete_project_cascade(&tx, project).unwrap();
        tx.commit().unwrap();

        assert_eq!(
            report,
            CascadeReport {
                projects: 1,
                features: 2,
                tasks: 3,
            }
        );
        assert!(get_record::<Project>(&conn, project).unwrap().is_none());
        assert!(!record_exists(&conn, Collection::Features, login).unwrap());
    }

    #[test]
    fn feature_cascade_on_missing_id_is_empty() {
        let conn = open_db_in_memory().unwrap();
        let report = delete_feature_cascade(&conn, 404).unwrap();
        assert!(report.is_empty());
    }
}
