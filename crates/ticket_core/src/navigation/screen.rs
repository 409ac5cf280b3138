use super::Route;
use crate::model::{Feature, Project, Task};
use crate::service::TicketService;
use crate::store::StoreResult;
use log::{debug, info};
use serde::Serialize;

/// What the presentation layer should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Screen {
    /// Every project.
    Projects { projects: Vec<Project> },
    /// One project and its features.
    Features {
        project: Project,
        features: Vec<Feature>,
    },
    /// One feature and its tasks.
    Tasks {
        project: Project,
        feature: Feature,
        tasks: Vec<Task>,
    },
}

impl Screen {
    /// Canonical route of the rendered screen.
    ///
    /// Differs from the requested route after a fallback or a legacy path.
    pub fn route(&self) -> Route {
        match self {
            Self::Projects { .. } => Route::root(),
            Self::Features { project, .. } => Route::project(project.id),
            Self::Tasks {
                project, feature, ..
            } => Route::feature(project.id, feature.id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Projects { .. } => "projects",
            Self::Features { .. } => "features",
            Self::Tasks { .. } => "tasks",
        }
    }
}

/// Resolves `route` to the deepest screen whose entities still exist.
///
/// # Contract
/// - Task view when the feature exists and belongs to the routed project
///   (any project for the legacy path).
/// - Otherwise the feature list when the project exists.
/// - Otherwise the project list.
///
/// # Errors
/// - Only store failures; missing entities are never an error.
pub async fn resolve_screen(service: &TicketService, route: &Route) -> StoreResult<Screen> {
    let screen = resolve_deepest(service, route).await?;
    let resolved = screen.route();
    if resolved == *route {
        debug!(
            "event=navigation_resolve module=navigation status=ok screen={} route={resolved}",
            screen.name()
        );
    } else {
        info!(
            "event=navigation_resolve module=navigation status=fallback screen={} requested={route} resolved={resolved}",
            screen.name()
        );
    }
    Ok(screen)
}

async fn resolve_deepest(service: &TicketService, route: &Route) -> StoreResult<Screen> {
    if let Some(feature_id) = route.feature_id {
        if let Some(feature) = service.get_feature(feature_id).await? {
            let owned = route
                .project_id
                .map_or(true, |project_id| project_id == feature.project_id);
            if owned {
                if let Some(project) = service.get_project(feature.project_id).await? {
                    let tasks = service.get_tasks_by_feature(feature.id).await?;
                    return Ok(Screen::Tasks {
                        project,
                        feature,
                        tasks,
                    });
                }
            }
        }
    }

    if let Some(project_id) = route.project_id {
        if let Some(project) = service.get_project(project_id).await? {
            let features = service.get_features_by_project(project.id).await?;
            return Ok(Screen::Features { project, features });
        }
    }

    let projects = service.get_all_projects().await?;
    Ok(Screen::Projects { projects })
}
