/// Project membership operations
///
/// Both operations check the project first so a missing project is
/// reported as such rather than as a missing membership.

use crate::error::{ServiceError, ServiceResult};
use crate::models::membership::Membership;
use crate::store::EntityStore;

/// Adds a user to a project
///
/// # Errors
///
/// - `NotFound` if the project or the user does not exist
/// - `Conflict` if the user is already a member, including when a
///   concurrent request wins the race to insert the row
pub async fn add_member(
    store: &dyn EntityStore,
    project_id: i64,
    user_id: i64,
) -> ServiceResult<Membership> {
    store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

    if store.find_membership(project_id, user_id).await?.is_some() {
        return Err(ServiceError::Conflict(
            "User is already a member of this project".to_string(),
        ));
    }

    let membership = store.add_membership(project_id, user_id).await?;

    tracing::info!(project_id, user_id, "Member added to project");

    Ok(membership)
}

/// Removes a user from a project
///
/// # Errors
///
/// - `NotFound` if the project does not exist
/// - `NotFound` if the user is not a member
pub async fn remove_member(
    store: &dyn EntityStore,
    project_id: i64,
    user_id: i64,
) -> ServiceResult<()> {
    store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

    let removed = store.remove_membership(project_id, user_id).await?;
    if !removed {
        return Err(ServiceError::NotFound(
            "User is not a member of this project".to_string(),
        ));
    }

    tracing::info!(project_id, user_id, "Member removed from project");

    Ok(())
}
