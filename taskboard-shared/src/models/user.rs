/// User model and database operations
///
/// Users are the accounts that log in, get assigned tasks and belong to
/// projects. The `is_admin` flag is the only role distinction.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     email VARCHAR(255),
///     bio TEXT,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::new("postgresql://localhost/taskboard")).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "ada".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     email: Some("ada@example.com".to_string()),
///     bio: None,
///     is_admin: false,
/// }).await?;
///
/// let found = User::find_by_name(&pool, "ada").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User account
///
/// The password hash is never serialized into API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Login handle, unique across all users
    pub name: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Optional contact address
    pub email: Option<String>,

    /// Optional free-form profile text
    pub bio: Option<String>,

    /// Administrator role flag
    pub is_admin: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login handle
    pub name: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Optional contact address
    pub email: Option<String>,

    /// Optional profile text
    pub bio: Option<String>,

    /// Administrator role flag
    pub is_admin: bool,
}

/// Profile fields a user may change
///
/// The whole profile is replaced: `None` clears `email`/`bio`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New login handle
    pub name: String,

    /// New contact address
    pub email: Option<String>,

    /// New profile text
    pub bio: Option<String>,
}

const USER_COLUMNS: &str = "id, name, password_hash, email, bio, is_admin, created_at, updated_at";

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken (unique violation on
    /// `users_name_key`) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, password_hash, email, bio, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.password_hash)
        .bind(data.email)
        .bind(data.bio)
        .bind(data.is_admin)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by login handle
    ///
    /// Used by login and to re-resolve the caller named in a token.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users ordered by ID
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists the members of a project ordered by ID
    pub async fn list_by_project(pool: &PgPool, project_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.password_hash, u.email, u.bio, u.is_admin,
                   u.created_at, u.updated_at
            FROM users u
            JOIN project_memberships pm ON pm.user_id = u.id
            WHERE pm.project_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Replaces a user's profile fields
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new name belongs to another user.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, bio = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.bio)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Memberships and assigned tasks go with it (`ON DELETE CASCADE`).
    /// Returns false if the user did not exist.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
