//! Ticket use-case service.
//!
//! # Responsibility
//! - Expose typed project/feature/task operations for presentation code.
//! - Delegate every call to one `Store` operation.
//!
//! # Invariants
//! - Each method is exactly one transaction; no cross-call atomicity.
//! - Deletes of projects and features cascade to their descendants.
//! - `get_*` by id reports absence as `Ok(None)`.

use crate::model::{
    Collection, Feature, FeatureStatus, IndexName, NewFeature, NewProject, NewTask, Project,
    ProjectSummary, RecordId, Task, TaskStatus,
};
use crate::repo::{summarize_project, CascadeReport};
use crate::store::{Store, StoreResult};

/// Typed facade over the ticket store.
///
/// Cheap to clone; clones share the underlying store handle.
#[derive(Debug, Clone)]
pub struct TicketService {
    store: Store,
}

impl TicketService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Underlying store, for callers that need the generic operations.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Creates a project and returns its id.
    pub async fn add_project(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> StoreResult<RecordId> {
        self.store
            .add::<Project>(NewProject::new(title, description))
            .await
    }

    pub async fn get_project(&self, id: RecordId) -> StoreResult<Option<Project>> {
        self.store.get::<Project>(id).await
    }

    pub async fn get_all_projects(&self) -> StoreResult<Vec<Project>> {
        self.store.get_all::<Project>().await
    }

    pub async fn update_project(&self, project: Project) -> StoreResult<Project> {
        self.store.update(project).await
    }

    /// Deletes a project with all of its features and their tasks.
    pub async fn delete_project(&self, id: RecordId) -> StoreResult<CascadeReport> {
        self.store.delete::<Project>(id).await
    }

    /// Feature/task counts for one project; `None` when it does not exist.
    pub async fn project_summary(
        &self,
        project_id: RecordId,
    ) -> StoreResult<Option<ProjectSummary>> {
        self.store
            .query("project_summary", Collection::Projects, move |tx| {
                summarize_project(tx, project_id)
            })
            .await
    }

    /// Creates a feature under an existing project.
    ///
    /// # Errors
    /// - `ConstraintViolation` when the title is blank or the project is missing.
    pub async fn add_feature(&self, feature: NewFeature) -> StoreResult<RecordId> {
        self.store.add::<Feature>(feature).await
    }

    pub async fn get_feature(&self, id: RecordId) -> StoreResult<Option<Feature>> {
        self.store.get::<Feature>(id).await
    }

    pub async fn get_all_features(&self) -> StoreResult<Vec<Feature>> {
        self.store.get_all::<Feature>().await
    }

    pub async fn get_features_by_project(&self, project_id: RecordId) -> StoreResult<Vec<Feature>> {
        self.store
            .get_by_index::<Feature>(IndexName::ProjectId, project_id)
            .await
    }

    pub async fn get_features_by_status(
        &self,
        status: &FeatureStatus,
    ) -> StoreResult<Vec<Feature>> {
        self.store
            .get_by_index::<Feature>(IndexName::Status, status)
            .await
    }

    pub async fn update_feature(&self, feature: Feature) -> StoreResult<Feature> {
        self.store.update(feature).await
    }

    /// Deletes a feature with all of its tasks.
    pub async fn delete_feature(&self, id: RecordId) -> StoreResult<CascadeReport> {
        self.store.delete::<Feature>(id).await
    }

    /// Creates a task under an existing feature.
    ///
    /// # Errors
    /// - `ConstraintViolation` when the title is blank or the feature is missing.
    pub async fn add_task(&self, task: NewTask) -> StoreResult<RecordId> {
        self.store.add::<Task>(task).await
    }

    pub async fn get_task(&self, id: RecordId) -> StoreResult<Option<Task>> {
        self.store.get::<Task>(id).await
    }

    pub async fn get_all_tasks(&self) -> StoreResult<Vec<Task>> {
        self.store.get_all::<Task>().await
    }

    pub async fn get_tasks_by_feature(&self, feature_id: RecordId) -> StoreResult<Vec<Task>> {
        self.store
            .get_by_index::<Task>(IndexName::FeatureId, feature_id)
            .await
    }

    pub async fn get_tasks_by_status(&self, status: TaskStatus) -> StoreResult<Vec<Task>> {
        self.store.get_by_index::<Task>(IndexName::Status, status).await
    }

    pub async fn update_task(&self, task: Task) -> StoreResult<Task> {
        self.store.update(task).await
    }

    /// Sets the status of an existing task.
    ///
    /// # Errors
    /// - `NotFound` when the task does not exist.
    pub async fn set_task_status(&self, id: RecordId, status: TaskStatus) -> StoreResult<Task> {
        self.store
            .modify::<Task, _>(id, move |task| task.status = status)
            .await
    }

    /// Flips a task between `open` and `completed`.
    ///
    /// # Errors
    /// - `NotFound` when the task does not exist.
    pub async fn toggle_task(&self, id: RecordId) -> StoreResult<Task> {
        self.store
            .modify::<Task, _>(id, |task| task.status = task.status.toggled())
            .await
    }

    pub async fn delete_task(&self, id: RecordId) -> StoreResult<CascadeReport> {
        self.store.delete::<Task>(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::TicketService;
    use crate::model::{NewFeature, NewTask, TaskStatus};
    use crate::store::Store;

    async fn service() -> TicketService {
        TicketService::new(Store::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn toggle_task_flips_status_and_back() {
        let service = service().await;
        let project = service.add_project("Website", "").await.unwrap();
        let feature = service
            .add_feature(NewFeature::new(project, "Login", ""))
            .await
            .unwrap();
        let task = service
            .add_task(NewTask::new(feature, "Form", ""))
            .await
            .unwrap();

        let completed = service.toggle_task(task).await.unwrap();
        assert_eq!(completed.status, TaskStatus::Completed);
        let reopened = service.toggle_task(task).await.unwrap();
        assert_eq!(reopened.status, TaskStatus::Open);
        assert!(reopened.last_modified >= completed.last_modified);
    }

    #[tokio::test]
    async fn set_task_status_on_missing_task_is_not_found() {
        let service = service().await;
        let err = service
            .set_task_status(41, TaskStatus::Completed)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
