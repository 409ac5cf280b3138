//! Aggregate counts over one project subtree.

use crate::model::{ProjectSummary, RecordId, TaskStatus};
use crate::repo::record_repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

const PROJECT_SUMMARY_SQL: &str = "SELECT
    (SELECT COUNT(*) FROM features WHERE project_id = ?1),
    (SELECT COUNT(*)
       FROM tasks t
       JOIN features f ON f.id = t.feature_id
      WHERE f.project_id = ?1),
    (SELECT COUNT(*)
       FROM tasks t
       JOIN features f ON f.id = t.feature_id
      WHERE f.project_id = ?1 AND t.status = ?2)
FROM projects
WHERE id = ?1;";

/// Counts features, tasks and completed tasks under a project.
///
/// Returns `None` when the project does not exist.
pub fn summarize_project(
    conn: &Connection,
    project_id: RecordId,
) -> RepoResult<Option<ProjectSummary>> {
    let summary = conn
        .query_row(
            PROJECT_SUMMARY_SQL,
            params![project_id, TaskStatus::Completed.as_str()],
            |row| {
                Ok(ProjectSummary {
                    project_id,
                    features: row.get::<_, i64>(0)? as usize,
                    tasks: row.get::<_, i64>(1)? as usize,
                    completed_tasks: row.get::<_, i64>(2)? as usize,
                })
            },
        )
        .optional()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::summarize_project;
    use crate::db::open_db_in_memory;
    use crate::model::{Feature, NewFeature, NewProject, NewTask, Project, Task, TaskStatus};
    use crate::repo::record_repo::insert_record;

    #[test]
    fn summary_counts_only_the_requested_project() {
        let conn = open_db_in_memory().unwrap();
        let website = insert_record::<Project>(&conn, &NewProject::new("Website", "")).unwrap();
        let mobile = insert_record::<Project>(&conn, &NewProject::new("Mobile", "")).unwrap();
        let login =
            insert_record::<Feature>(&conn, &NewFeature::new(website, "Login", "")).unwrap();
        let push = insert_record::<Feature>(&conn, &NewFeature::new(mobile, "Push", "")).unwrap();

        insert_record::<Task>(&conn, &NewTask::new(login, "Form", "")).unwrap();
        insert_record::<Task>(
            &conn,
            &NewTask::new(login, "Backend", "").with_status(TaskStatus::Completed),
        )
        .unwrap();
        insert_record::<Task>(&conn, &NewTask::new(push, "Tokens", "")).unwrap();

        let summary = summarize_project(&conn, website).unwrap().unwrap();
        assert_eq!(summary.features, 1);
        assert_eq!(summary.tasks, 2);
        assert_eq!(summary.completed_tasks, 1);
        assert!((summary.completion_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_of_missing_project_is_none() {
        let conn = open_db_in_memory().unwrap();
        assert!(summarize_project(&conn, 7).unwrap().is_none());
    }
}
