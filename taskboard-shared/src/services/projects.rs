/// Project operations

use serde::Serialize;
use std::collections::HashSet;

use crate::error::{ServiceError, ServiceResult};
use crate::models::project::{CreateProject, Project};
use crate::models::user::User;
use crate::store::EntityStore;

/// A project together with its members
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetails {
    /// The project itself
    #[serde(flatten)]
    pub project: Project,

    /// Member accounts ordered by ID
    pub members: Vec<User>,
}

/// Input for creating a project
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Users to add as members; duplicates are ignored
    pub user_ids: Vec<i64>,
}

/// Creates a project with its initial members
///
/// Every referenced user is checked before anything is written, and the
/// project and memberships are stored together.
///
/// # Errors
///
/// `BadRequest` listing every unknown user ID.
pub async fn create_project(store: &dyn EntityStore, input: NewProject) -> ServiceResult<ProjectDetails> {
    let mut seen = HashSet::with_capacity(input.user_ids.len());
    let member_ids: Vec<i64> = input
        .user_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();

    let mut missing = Vec::new();
    for &id in &member_ids {
        if store.find_user(id).await?.is_none() {
            missing.push(id.to_string());
        }
    }

    if !missing.is_empty() {
        return Err(ServiceError::BadRequest(format!(
            "Unknown user ids: {}",
            missing.join(", ")
        )));
    }

    let project = store
        .create_project(
            CreateProject {
                name: input.name,
                description: input.description,
            },
            &member_ids,
        )
        .await?;

    tracing::info!(project_id = project.id, members = member_ids.len(), "Project created");

    let members = store.list_project_members(project.id).await?;

    Ok(ProjectDetails { project, members })
}

/// Gets a project and its members
pub async fn get_project(store: &dyn EntityStore, project_id: i64) -> ServiceResult<ProjectDetails> {
    let project = store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

    let members = store.list_project_members(project_id).await?;

    Ok(ProjectDetails { project, members })
}

/// Lists all projects
pub async fn list_projects(store: &dyn EntityStore) -> ServiceResult<Vec<Project>> {
    Ok(store.list_projects().await?)
}

/// Deletes a project along with its memberships and tasks
pub async fn delete_project(store: &dyn EntityStore, project_id: i64) -> ServiceResult<()> {
    if !store.delete_project(project_id).await? {
        return Err(ServiceError::NotFound(format!("Project {} not found", project_id)));
    }

    tracing::info!(project_id, "Project deleted");

    Ok(())
}
