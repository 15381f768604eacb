/// Project membership model and database operations
///
/// Memberships are the many-to-many join between users and projects. The
/// composite primary key guarantees at most one row per (project, user) pair,
/// which is the backstop when two `AddMember` requests race.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_memberships (
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::membership::Membership;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// Membership::create(&pool, 1, 2).await?;
/// assert!(Membership::find(&pool, 1, 2).await?.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the primary key constraint, reported on duplicate inserts
pub const MEMBERSHIP_PKEY: &str = "project_memberships_pkey";

/// A user's membership in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Project ID
    pub project_id: i64,

    /// User ID
    pub user_id: i64,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Adds a user to a project
    ///
    /// # Errors
    ///
    /// Returns a unique violation on [`MEMBERSHIP_PKEY`] if the membership
    /// already exists, or a foreign key violation if either side is missing.
    pub async fn create(pool: &PgPool, project_id: i64, user_id: i64) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO project_memberships (project_id, user_id)
            VALUES ($1, $2)
            RETURNING project_id, user_id, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Finds a membership by its composite key
    pub async fn find(
        pool: &PgPool,
        project_id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT project_id, user_id, created_at
            FROM project_memberships
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Removes a user from a project
    ///
    /// Returns false if the membership did not exist.
    pub async fn delete(pool: &PgPool, project_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_memberships WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
