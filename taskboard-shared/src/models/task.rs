/// Task model and database operations
///
/// A task belongs to one project, is assigned to one user (the assignee) and
/// remembers which admin handed it out (the assigner).
///
/// # Status
///
/// The status is an open vocabulary: "Todo", "InProgress", "Blocked" or any
/// other non-empty string. Only [`TaskStatus::DONE`] carries meaning, because
/// closing a task is reserved to its assigner.
///
/// ```text
/// any open status ──(assignee)──> any open status
/// any open status ──(assigner)──> Done
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status VARCHAR(50) NOT NULL,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assigned_by_id BIGINT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, CreateTask, TaskStatus};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write release notes".to_string(),
///     description: String::new(),
///     status: TaskStatus::new("Todo"),
///     project_id: 1,
///     user_id: 2,
///     assigned_by_id: 1,
/// }).await?;
///
/// Task::update_status(&pool, task.id, &TaskStatus::new("InProgress")).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;

/// Task status value
///
/// Stored and serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TaskStatus(String);

impl TaskStatus {
    /// The closing status
    pub const DONE: &'static str = "Done";

    /// Wraps a status string
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// The closing status as a value
    pub fn done() -> Self {
        Self::new(Self::DONE)
    }

    /// True if this status closes the task (exact, case-sensitive match)
    pub fn is_done(&self) -> bool {
        self.0 == Self::DONE
    }

    /// Borrows the raw status string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskStatus {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Short summary
    pub title: String,

    /// Longer description
    pub description: String,

    /// Current status
    pub status: TaskStatus,

    /// Project the task belongs to
    pub project_id: i64,

    /// Assignee
    pub user_id: i64,

    /// Admin who created the task; never changes after creation
    pub assigned_by_id: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short summary
    pub title: String,

    /// Longer description
    pub description: String,

    /// Initial status
    pub status: TaskStatus,

    /// Project the task belongs to
    pub project_id: i64,

    /// Assignee
    pub user_id: i64,

    /// Creating admin
    pub assigned_by_id: i64,
}

const TASK_COLUMNS: &str =
    "id, title, description, status, project_id, user_id, assigned_by_id, created_at, updated_at";

impl Task {
    /// Creates a task
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the project or assignee does not
    /// exist.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, project_id, user_id, assigned_by_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.project_id)
        .bind(data.user_id)
        .bind(data.assigned_by_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks ordered by ID
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks of one project ordered by ID
    pub async fn list_by_project(pool: &PgPool, project_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY id"
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Writes a new status
    ///
    /// Only `status` and `updated_at` are touched. Returns `None` if the task
    /// no longer exists.
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: &TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Returns false if the task did not exist.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
