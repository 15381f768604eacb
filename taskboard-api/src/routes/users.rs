/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/users/register`: self-service registration (public)
/// - `POST /api/users/login`: exchange name and password for a token (public)
/// - `GET /api/users`, `GET /api/users/:id`: read accounts
/// - `POST /api/users`: create an account, optionally an admin (admin)
/// - `PUT /api/users/:id`: replace name, email and bio (self or admin)
/// - `DELETE /api/users/:id`: delete an account (admin)
///
/// # Example
///
/// ```text
/// POST /api/users/login
/// { "name": "ada", "password": "analytical-engine" }
///
/// 200 OK
/// { "user": { "id": 1, "name": "ada", ... }, "token": "eyJhbGciOiJIUzI1NiJ9..." }
/// ```

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
    models::user::{UpdateUser, User},
    services::users::{self, LoginOutcome, NewUser},
};
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login handle
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional contact address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Optional profile text
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

/// Admin-side account creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Login handle
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional contact address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Optional profile text
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,

    /// Grant the admin role
    #[serde(default)]
    pub is_admin: bool,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login handle
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update request
///
/// Replaces the whole profile; omitted `email`/`bio` are cleared.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New login handle
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    /// New contact address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New profile text
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        NewUser {
            name: req.name,
            password: req.password,
            email: req.email,
            bio: req.bio,
        }
    }
}

/// Registers a regular user
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validate_request(&req)?;

    let user = users::register(state.store(), req.into()).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Logs a user in
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginOutcome>> {
    validate_request(&req)?;

    let outcome = users::login(state.store(), &req.name, &req.password, state.jwt_settings()).await?;

    Ok(Json(outcome))
}

/// Creates an account (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    require_admin(&auth)?;
    validate_request(&req)?;

    let account = NewUser {
        name: req.name,
        password: req.password,
        email: req.email,
        bio: req.bio,
    };

    let user = users::create_user(state.store(), account, req.is_admin).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Lists all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(users::list_users(state.store()).await?))
}

/// Gets one user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    Ok(Json(users::get_user(state.store(), id).await?))
}

/// Replaces a user's profile
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    validate_request(&req)?;

    let update = UpdateUser {
        name: req.name,
        email: req.email,
        bio: req.bio,
    };

    Ok(Json(users::update_user(state.store(), id, update, &auth).await?))
}

/// Deletes a user (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&auth)?;

    users::delete_user(state.store(), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
