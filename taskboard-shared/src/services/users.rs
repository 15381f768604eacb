/// Account operations
///
/// Registration and admin-side creation both hash the password with
/// Argon2id before anything reaches the store. Login answers with the same
/// `Unauthorized` error for an unknown name and a wrong password.

use serde::Serialize;

use crate::auth::authorization::require_self_or_admin;
use crate::auth::jwt::{issue_token, JwtSettings};
use crate::auth::middleware::AuthContext;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::store::EntityStore;

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login handle
    pub name: String,

    /// Plaintext password
    pub password: String,

    /// Optional contact address
    pub email: Option<String>,

    /// Optional profile text
    pub bio: Option<String>,
}

/// Successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// The authenticated account
    pub user: User,

    /// Bearer token for subsequent requests
    pub token: String,
}

async fn insert_user(store: &dyn EntityStore, input: NewUser, is_admin: bool) -> ServiceResult<User> {
    let password_hash = hash_password(&input.password)?;

    let user = store
        .create_user(CreateUser {
            name: input.name,
            password_hash,
            email: input.email,
            bio: input.bio,
            is_admin,
        })
        .await?;

    tracing::info!(user_id = user.id, name = %user.name, is_admin, "User created");

    Ok(user)
}

/// Self-service registration; always a regular user
///
/// # Errors
///
/// `Conflict` if the name is taken.
pub async fn register(store: &dyn EntityStore, input: NewUser) -> ServiceResult<User> {
    insert_user(store, input, false).await
}

/// Account creation by an administrator, who may grant the admin role
pub async fn create_user(store: &dyn EntityStore, input: NewUser, is_admin: bool) -> ServiceResult<User> {
    insert_user(store, input, is_admin).await
}

/// Checks credentials and issues a token
///
/// # Errors
///
/// `Unauthorized` if the name is unknown or the password is wrong.
pub async fn login(
    store: &dyn EntityStore,
    name: &str,
    password: &str,
    settings: &JwtSettings,
) -> ServiceResult<LoginOutcome> {
    let invalid = || ServiceError::Unauthorized("Invalid name or password".to_string());

    let user = store.find_user_by_name(name).await?.ok_or_else(invalid)?;

    if !verify_password(password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Password mismatch");
        return Err(invalid());
    }

    let token = issue_token(&user, settings)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(LoginOutcome { user, token })
}

/// Gets a user by ID
pub async fn get_user(store: &dyn EntityStore, user_id: i64) -> ServiceResult<User> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))
}

/// Lists all users
pub async fn list_users(store: &dyn EntityStore) -> ServiceResult<Vec<User>> {
    Ok(store.list_users().await?)
}

/// Replaces a user's profile
///
/// # Errors
///
/// - `Forbidden` unless the caller is the user or an administrator
/// - `NotFound` if the user does not exist
/// - `Conflict` if the new name belongs to someone else
pub async fn update_user(
    store: &dyn EntityStore,
    user_id: i64,
    update: UpdateUser,
    caller: &AuthContext,
) -> ServiceResult<User> {
    require_self_or_admin(caller, user_id)?;

    let user = store
        .update_user(user_id, update)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

    tracing::info!(user_id, caller = caller.user_id, "User profile updated");

    Ok(user)
}

/// Deletes a user along with their memberships and assigned tasks
pub async fn delete_user(store: &dyn EntityStore, user_id: i64) -> ServiceResult<()> {
    if !store.delete_user(user_id).await? {
        return Err(ServiceError::NotFound(format!("User {} not found", user_id)));
    }

    tracing::info!(user_id, "User deleted");

    Ok(())
}

/// Makes sure an administrator account named `name` exists
///
/// Used at startup. An existing account with that name is returned as is,
/// with a warning if it lacks the admin role.
pub async fn ensure_admin(store: &dyn EntityStore, name: &str, password: &str) -> ServiceResult<User> {
    if let Some(existing) = store.find_user_by_name(name).await? {
        if !existing.is_admin {
            tracing::warn!(user_id = existing.id, name, "Bootstrap account exists without admin role");
        }
        return Ok(existing);
    }

    create_user(
        store,
        NewUser {
            name: name.to_string(),
            password: password.to_string(),
            email: None,
            bio: None,
        },
        true,
    )
    .await
}
