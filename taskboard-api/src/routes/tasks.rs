/// Task endpoints
///
/// # Endpoints
///
/// - `GET /api/tasks`, `GET /api/tasks/:id`: read tasks
/// - `GET /api/projects/:id/tasks`: tasks of one project
/// - `POST /api/tasks`: create and assign a task (admin)
/// - `PUT /api/tasks/:id/status`: change status (assignee, or assigner to close)
/// - `DELETE /api/tasks/:id`: delete a task (admin)
///
/// # Example
///
/// ```text
/// PUT /api/tasks/12/status
/// Authorization: Bearer <token>
/// { "status": "InProgress" }
///
/// 200 OK
/// { "id": 12, "status": "InProgress", "user_id": 2, "assigned_by_id": 1, ... }
/// ```

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{authorization::require_admin, middleware::AuthContext},
    models::task::{Task, TaskStatus},
    services::tasks::{self, NewTask},
};
use validator::Validate;

fn default_status() -> String {
    "Todo".to_string()
}

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short summary
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,

    /// Longer description
    #[serde(default)]
    pub description: String,

    /// Initial status
    #[serde(default = "default_status")]
    #[validate(length(min = 1, max = 50, message = "Status must be 1 to 50 characters"))]
    pub status: String,

    /// Owning project
    pub project_id: i64,

    /// Assignee
    pub user_id: i64,
}

/// Status change request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    /// Requested status
    #[validate(length(min = 1, max = 50, message = "Status must be 1 to 50 characters"))]
    pub status: String,
}

/// Lists all tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(tasks::list_tasks(state.store()).await?))
}

/// Lists the tasks of a project
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(tasks::list_project_tasks(state.store(), project_id).await?))
}

/// Gets one task
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    Ok(Json(tasks::get_task(state.store(), id).await?))
}

/// Creates a task assigned by the caller (admin only)
///
/// Responds 201 with a `Location` header pointing at the new task.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<Task>)> {
    require_admin(&auth)?;
    validate_request(&req)?;

    let task = tasks::create_task(
        state.store(),
        NewTask {
            title: req.title,
            description: req.description,
            status: TaskStatus::new(req.status),
            project_id: req.project_id,
            user_id: req.user_id,
        },
        &auth,
    )
    .await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/tasks/{}", task.id)) {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(task)))
}

/// Changes a task's status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Task>> {
    validate_request(&req)?;

    let task = tasks::update_status(state.store(), id, TaskStatus::new(req.status), &auth).await?;

    Ok(Json(task))
}

/// Deletes a task (admin only)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;

    tasks::delete_task(state.store(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
