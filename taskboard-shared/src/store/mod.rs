/// Entity store abstraction
///
/// The services in [`crate::services`] never talk to PostgreSQL directly.
/// They go through [`EntityStore`], which offers lookup by id, lookup by the
/// membership composite key and listing by foreign key. Two implementations
/// exist:
///
/// - [`PgStore`]: PostgreSQL via sqlx; referential actions and the
///   membership primary key are enforced by the schema
/// - [`MemoryStore`]: in-process tables emulating the same constraints and
///   cascades, used by the test suites
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::store::{EntityStore, MemoryStore};
///
/// let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
/// ```

use async_trait::async_trait;

use crate::models::{
    membership::{Membership, MEMBERSHIP_PKEY},
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskStatus},
    user::{CreateUser, UpdateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Name of the unique constraint on `users.name`
pub const USER_NAME_KEY: &str = "users_name_key";

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by entity store implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("{0}")]
    Conflict(String),

    /// A referenced row does not exist (foreign key violation)
    #[error("{0}")]
    MissingReference(String),

    /// Any other storage failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Conflict raised for a duplicate membership
    pub fn duplicate_membership() -> Self {
        StoreError::Conflict("User is already a member of this project".to_string())
    }

    /// Conflict raised for a duplicate login handle
    pub fn duplicate_user_name(name: &str) -> Self {
        StoreError::Conflict(format!("User name '{}' already exists", name))
    }
}

/// Translates constraint violations into store errors
///
/// Unique violations become [`StoreError::Conflict`] so a lost race on the
/// membership key surfaces as a conflict rather than an internal error.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some(MEMBERSHIP_PKEY) => StoreError::duplicate_membership(),
                    Some(USER_NAME_KEY) => {
                        StoreError::Conflict("User name already exists".to_string())
                    }
                    Some(constraint) => {
                        StoreError::Conflict(format!("Constraint violation: {}", constraint))
                    }
                    None => StoreError::Conflict("Duplicate value".to_string()),
                };
            }

            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(
                    "Referenced project or user no longer exists".to_string(),
                );
            }
        }

        StoreError::Database(err)
    }
}

/// Persistent storage for users, projects, memberships and tasks
///
/// Implementations must cascade membership and task deletion when the owning
/// user or project is deleted, and must reject a second membership for the
/// same (project, user) pair with [`StoreError::Conflict`].
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Verifies the backing storage is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Inserts a user; duplicate names are a conflict
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Looks a user up by ID
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    /// Looks a user up by login handle
    async fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>>;

    /// Lists users ordered by ID
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Replaces a user's profile; `None` if the user does not exist
    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>>;

    /// Deletes a user with cascade; false if absent
    async fn delete_user(&self, id: i64) -> StoreResult<bool>;

    /// Inserts a project and its initial memberships atomically
    async fn create_project(&self, data: CreateProject, member_ids: &[i64]) -> StoreResult<Project>;

    /// Looks a project up by ID
    async fn find_project(&self, id: i64) -> StoreResult<Option<Project>>;

    /// Lists projects ordered by ID
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Lists the users that are members of a project
    async fn list_project_members(&self, project_id: i64) -> StoreResult<Vec<User>>;

    /// Deletes a project with cascade; false if absent
    async fn delete_project(&self, id: i64) -> StoreResult<bool>;

    /// Inserts a membership; duplicates are a conflict
    async fn add_membership(&self, project_id: i64, user_id: i64) -> StoreResult<Membership>;

    /// Looks a membership up by its composite key
    async fn find_membership(&self, project_id: i64, user_id: i64) -> StoreResult<Option<Membership>>;

    /// Deletes a membership; false if absent
    async fn remove_membership(&self, project_id: i64, user_id: i64) -> StoreResult<bool>;

    /// Inserts a task; missing project or assignee is a missing reference
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Looks a task up by ID
    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>>;

    /// Lists tasks ordered by ID
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Lists the tasks of one project
    async fn list_tasks_by_project(&self, project_id: i64) -> StoreResult<Vec<Task>>;

    /// Writes a task's status and nothing else; `None` if the task is gone
    async fn update_task_status(&self, id: i64, status: &TaskStatus) -> StoreResult<Option<Task>>;

    /// Deletes a task; false if absent
    async fn delete_task(&self, id: i64) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_duplicate_messages() {
        assert_eq!(
            StoreError::duplicate_membership().to_string(),
            "User is already a member of this project"
        );
        assert_eq!(
            StoreError::duplicate_user_name("ada").to_string(),
            "User name 'ada' already exists"
        );
    }
}
