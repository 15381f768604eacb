/// PostgreSQL entity store
///
/// Thin adapter from [`EntityStore`] to the SQL on the model types. Every
/// sqlx error passes through `StoreError::from`, which turns unique and
/// foreign key violations into conflicts and missing references.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{EntityStore, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    membership::Membership,
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskStatus},
    user::{CreateUser, UpdateUser, User},
};

/// Entity store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps a connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_name(&self.pool, name).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(User::list(&self.pool).await?)
    }

    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        Ok(User::update(&self.pool, id, data).await?)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn create_project(&self, data: CreateProject, member_ids: &[i64]) -> StoreResult<Project> {
        Ok(Project::create_with_members(&self.pool, data, member_ids).await?)
    }

    async fn find_project(&self, id: i64) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(Project::list(&self.pool).await?)
    }

    async fn list_project_members(&self, project_id: i64) -> StoreResult<Vec<User>> {
        Ok(User::list_by_project(&self.pool, project_id).await?)
    }

    async fn delete_project(&self, id: i64) -> StoreResult<bool> {
        Ok(Project::delete(&self.pool, id).await?)
    }

    async fn add_membership(&self, project_id: i64, user_id: i64) -> StoreResult<Membership> {
        Ok(Membership::create(&self.pool, project_id, user_id).await?)
    }

    async fn find_membership(&self, project_id: i64, user_id: i64) -> StoreResult<Option<Membership>> {
        Ok(Membership::find(&self.pool, project_id, user_id).await?)
    }

    async fn remove_membership(&self, project_id: i64, user_id: i64) -> StoreResult<bool> {
        Ok(Membership::delete(&self.pool, project_id, user_id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(Task::list(&self.pool).await?)
    }

    async fn list_tasks_by_project(&self, project_id: i64) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_project(&self.pool, project_id).await?)
    }

    async fn update_task_status(&self, id: i64, status: &TaskStatus) -> StoreResult<Option<Task>> {
        Ok(Task::update_status(&self.pool, id, status).await?)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }
}
