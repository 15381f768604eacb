/// Project and membership endpoints
///
/// # Endpoints
///
/// - `GET /api/projects`: list projects (public)
/// - `POST /api/projects`: create a project with initial members (admin)
/// - `GET /api/projects/:id`: project with its members
/// - `DELETE /api/projects/:id`: delete a project and its tasks (admin)
/// - `POST /api/projects/:id/members`: add a member (admin)
/// - `DELETE /api/projects/:id/members/:user_id`: remove a member (admin)

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{authorization::require_admin, middleware::AuthContext},
    models::{membership::Membership, project::Project},
    services::{
        membership,
        projects::{self, NewProject, ProjectDetails},
    },
};
use validator::Validate;

/// Project creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Display name
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Initial members
    #[serde(default)]
    pub user_ids: Vec<i64>,
}

/// Add-member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: i64,
}

/// Lists all projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(projects::list_projects(state.store()).await?))
}

/// Creates a project (admin only)
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectDetails>)> {
    require_admin(&auth)?;
    validate_request(&req)?;

    let details = projects::create_project(
        state.store(),
        NewProject {
            name: req.name,
            description: req.description,
            user_ids: req.user_ids,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(details)))
}

/// Gets a project with its members
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectDetails>> {
    Ok(Json(projects::get_project(state.store(), id).await?))
}

/// Deletes a project (admin only)
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;

    projects::delete_project(state.store(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Adds a member (admin only)
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<i64>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    require_admin(&auth)?;

    let created = membership::add_member(state.store(), project_id, req.user_id).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Removes a member (admin only)
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;

    membership::remove_member(state.store(), project_id, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
