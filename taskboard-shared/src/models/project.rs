/// Project model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Project grouping tasks and members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Display name
    pub name: String,

    /// Free-form description
    pub description: String,
}

impl Project {
    /// Creates a project and its initial memberships in one transaction
    ///
    /// Either the project and every membership row are committed, or nothing
    /// is. `member_ids` must already be de-duplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if a member ID does not reference a user (foreign key
    /// violation) or the database is unreachable.
    pub async fn create_with_members(
        pool: &PgPool,
        data: CreateProject,
        member_ids: &[i64],
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in member_ids {
            sqlx::query("INSERT INTO project_memberships (project_id, user_id) VALUES ($1, $2)")
                .bind(project.id)
                .bind(*user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects ordered by ID
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, created_at, updated_at FROM projects ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Deletes a project; memberships and tasks cascade
    ///
    /// Returns false if the project did not exist.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
