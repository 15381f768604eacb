/// Task creation and lifecycle
///
/// Tasks are created by administrators, who become the task's assigner.
/// Afterwards the only mutation is a status change, governed by
/// [`authorize_status_change`]. The caller named in the token is looked up
/// again on every status change so that a deleted or renamed account cannot
/// keep acting on a still-valid token.

use crate::auth::authorization::authorize_status_change;
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::User;
use crate::store::EntityStore;

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Short summary
    pub title: String,

    /// Longer description
    pub description: String,

    /// Initial status
    pub status: TaskStatus,

    /// Owning project
    pub project_id: i64,

    /// Assignee
    pub user_id: i64,
}

/// Resolves the token's caller to a live account
///
/// The login name must belong to a user whose ID matches the token subject.
async fn resolve_caller(store: &dyn EntityStore, caller: &AuthContext) -> ServiceResult<User> {
    store
        .find_user_by_name(&caller.name)
        .await?
        .filter(|user| user.id == caller.user_id)
        .ok_or_else(|| ServiceError::NotFound("Caller account no longer exists".to_string()))
}

/// Creates a task assigned by the caller
///
/// # Errors
///
/// - `NotFound` if the project or the assignee does not exist
/// - `BadRequest` if the caller's ID does not resolve to a user
pub async fn create_task(
    store: &dyn EntityStore,
    input: NewTask,
    caller: &AuthContext,
) -> ServiceResult<Task> {
    store
        .find_project(input.project_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", input.project_id)))?;

    store
        .find_user(input.user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", input.user_id)))?;

    let assigner = store
        .find_user(caller.user_id)
        .await?
        .ok_or_else(|| ServiceError::BadRequest("Invalid caller identity".to_string()))?;

    let task = store
        .create_task(CreateTask {
            title: input.title,
            description: input.description,
            status: input.status,
            project_id: input.project_id,
            user_id: input.user_id,
            assigned_by_id: assigner.id,
        })
        .await?;

    tracing::info!(
        task_id = task.id,
        project_id = task.project_id,
        assignee = task.user_id,
        assigner = task.assigned_by_id,
        "Task created"
    );

    Ok(task)
}

/// Changes a task's status on behalf of the caller
///
/// Only the status changes; assignee, assigner, project and title are left
/// untouched.
///
/// # Errors
///
/// - `NotFound` if the caller's account is gone or the task does not exist
/// - `Forbidden` if the status policy rejects the change
pub async fn update_status(
    store: &dyn EntityStore,
    task_id: i64,
    status: TaskStatus,
    caller: &AuthContext,
) -> ServiceResult<Task> {
    let caller_user = resolve_caller(store, caller).await?;

    let task = store
        .find_task(task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Task {} not found", task_id)))?;

    if let Err(err) = authorize_status_change(task.user_id, task.assigned_by_id, &status, caller_user.id) {
        tracing::warn!(task_id, caller = caller_user.id, status = %status, "Status change rejected: {}", err);
        return Err(err.into());
    }

    let updated = store
        .update_task_status(task_id, &status)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Task {} not found", task_id)))?;

    tracing::info!(task_id, caller = caller_user.id, status = %updated.status, "Task status updated");

    Ok(updated)
}

/// Gets a task by ID
pub async fn get_task(store: &dyn EntityStore, task_id: i64) -> ServiceResult<Task> {
    store
        .find_task(task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Task {} not found", task_id)))
}

/// Lists all tasks
pub async fn list_tasks(store: &dyn EntityStore) -> ServiceResult<Vec<Task>> {
    Ok(store.list_tasks().await?)
}

/// Lists the tasks of a project
///
/// # Errors
///
/// `NotFound` if the project does not exist.
pub async fn list_project_tasks(store: &dyn EntityStore, project_id: i64) -> ServiceResult<Vec<Task>> {
    store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

    Ok(store.list_tasks_by_project(project_id).await?)
}

/// Deletes a task
pub async fn delete_task(store: &dyn EntityStore, task_id: i64) -> ServiceResult<()> {
    if !store.delete_task(task_id).await? {
        return Err(ServiceError::NotFound(format!("Task {} not found", task_id)));
    }

    tracing::info!(task_id, "Task deleted");

    Ok(())
}
