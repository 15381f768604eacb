/// In-memory entity store
///
/// Holds every table behind one `tokio::sync::RwLock`, so each trait call is
/// a single critical section. It reproduces the constraints of the SQL
/// schema that the services rely on:
///
/// - `users.name` is unique
/// - one membership per (project, user)
/// - memberships and tasks reference existing projects and users
/// - deleting a user or project cascades to memberships and tasks
///
/// `assigned_by_id` is deliberately not checked, matching the schema.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{EntityStore, StoreError, StoreResult};
use crate::models::{
    membership::Membership,
    project::{CreateProject, Project},
    task::{CreateTask, Task, TaskStatus},
    user::{CreateUser, UpdateUser, User},
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    projects: BTreeMap<i64, Project>,
    memberships: BTreeMap<(i64, i64), Membership>,
    tasks: BTreeMap<i64, Task>,
    next_user_id: i64,
    next_project_id: i64,
    next_task_id: i64,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|user| user.name == name && Some(user.id) != except)
    }

    fn missing_reference() -> StoreError {
        StoreError::MissingReference("Referenced project or user no longer exists".to_string())
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Entity store kept in process memory
///
/// Cloning shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.name_taken(&data.name, None) {
            return Err(StoreError::duplicate_user_name(&data.name));
        }

        let now = Utc::now();
        let user = User {
            id: next_id(&mut tables.next_user_id),
            name: data.name,
            password_hash: data.password_hash,
            email: data.email,
            bio: data.bio,
            is_admin: data.is_admin,
            created_at: now,
            updated_at: now,
        };

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|user| user.name == name).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&id) {
            return Ok(None);
        }

        if tables.name_taken(&data.name, Some(id)) {
            return Err(StoreError::duplicate_user_name(&data.name));
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        user.name = data.name;
        user.email = data.email;
        user.bio = data.bio;
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        tables.memberships.retain(|(_, user_id), _| *user_id != id);
        tables.tasks.retain(|_, task| task.user_id != id);

        Ok(true)
    }

    async fn create_project(&self, data: CreateProject, member_ids: &[i64]) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        // Validate every member before writing anything
        if member_ids.iter().any(|id| !tables.users.contains_key(id)) {
            return Err(Tables::missing_reference());
        }

        let now = Utc::now();
        let project = Project {
            id: next_id(&mut tables.next_project_id),
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        };

        for &user_id in member_ids {
            if tables.memberships.contains_key(&(project.id, user_id)) {
                continue;
            }
            tables.memberships.insert(
                (project.id, user_id),
                Membership {
                    project_id: project.id,
                    user_id,
                    created_at: now,
                },
            );
        }

        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: i64) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.tables.read().await.projects.values().cloned().collect())
    }

    async fn list_project_members(&self, project_id: i64) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;

        let members = tables
            .memberships
            .keys()
            .filter(|(pid, _)| *pid == project_id)
            .filter_map(|(_, user_id)| tables.users.get(user_id).cloned())
            .collect();

        Ok(members)
    }

    async fn delete_project(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if tables.projects.remove(&id).is_none() {
            return Ok(false);
        }

        tables.memberships.retain(|(project_id, _), _| *project_id != id);
        tables.tasks.retain(|_, task| task.project_id != id);

        Ok(true)
    }

    async fn add_membership(&self, project_id: i64, user_id: i64) -> StoreResult<Membership> {
        let mut tables = self.tables.write().await;

        if !tables.projects.contains_key(&project_id) || !tables.users.contains_key(&user_id) {
            return Err(Tables::missing_reference());
        }

        if tables.memberships.contains_key(&(project_id, user_id)) {
            return Err(StoreError::duplicate_membership());
        }

        let membership = Membership {
            project_id,
            user_id,
            created_at: Utc::now(),
        };

        tables
            .memberships
            .insert((project_id, user_id), membership.clone());

        Ok(membership)
    }

    async fn find_membership(&self, project_id: i64, user_id: i64) -> StoreResult<Option<Membership>> {
        let tables = self.tables.read().await;
        Ok(tables.memberships.get(&(project_id, user_id)).cloned())
    }

    async fn remove_membership(&self, project_id: i64, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.memberships.remove(&(project_id, user_id)).is_some())
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.projects.contains_key(&data.project_id)
            || !tables.users.contains_key(&data.user_id)
        {
            return Err(Tables::missing_reference());
        }

        let now = Utc::now();
        let task = Task {
            id: next_id(&mut tables.next_task_id),
            title: data.title,
            description: data.description,
            status: data.status,
            project_id: data.project_id,
            user_id: data.user_id,
            assigned_by_id: data.assigned_by_id,
            created_at: now,
            updated_at: now,
        };

        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tables.read().await.tasks.values().cloned().collect())
    }

    async fn list_tasks_by_project(&self, project_id: i64) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;

        Ok(tables
            .tasks
            .values()
            .filter(|task| task.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_task_status(&self, id: i64, status: &TaskStatus) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        let Some(task) = tables.tasks.get_mut(&id) else {
            return Ok(None);
        };

        task.status = status.clone();
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            password_hash: "hash".to_string(),
            email: None,
            bio: None,
            is_admin: false,
        }
    }

    fn project(name: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            description: String::new(),
        }
    }

    fn task(project_id: i64, user_id: i64, assigned_by_id: i64) -> CreateTask {
        CreateTask {
            title: "task".to_string(),
            description: String::new(),
            status: TaskStatus::new("Todo"),
            project_id,
            user_id,
            assigned_by_id,
        }
    }

    #[tokio::test]
    async fn test_user_names_are_unique() {
        let store = MemoryStore::new();
        store.create_user(user("ada")).await.unwrap();

        let err = store.create_user(user("ada")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_conflicts() {
        let store = MemoryStore::new();
        store.create_user(user("ada")).await.unwrap();
        let bob = store.create_user(user("bob")).await.unwrap();

        let rename = UpdateUser {
            name: "ada".to_string(),
            email: None,
            bio: None,
        };
        let err = store.update_user(bob.id, rename).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let keep = UpdateUser {
            name: "bob".to_string(),
            email: Some("bob@example.com".to_string()),
            bio: None,
        };
        let updated = store.update_user(bob.id, keep).await.unwrap().unwrap();
        assert_eq!(updated.email.as_deref(), Some("bob@example.com"));
    }

    #[tokio::test]
    async fn test_duplicate_membership_conflicts() {
        let store = MemoryStore::new();
        let ada = store.create_user(user("ada")).await.unwrap();
        let p = store.create_project(project("p"), &[]).await.unwrap();

        store.add_membership(p.id, ada.id).await.unwrap();
        let err = store.add_membership(p.id, ada.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_project_with_unknown_member_writes_nothing() {
        let store = MemoryStore::new();
        let ada = store.create_user(user("ada")).await.unwrap();

        let err = store
            .create_project(project("p"), &[ada.id, 99])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
        assert!(store.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_task_requires_project_and_assignee() {
        let store = MemoryStore::new();
        let ada = store.create_user(user("ada")).await.unwrap();
        let p = store.create_project(project("p"), &[]).await.unwrap();

        let err = store.create_task(task(p.id, 42, ada.id)).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));

        let err = store.create_task(task(42, ada.id, ada.id)).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));

        // Assigner is not a reference
        store.create_task(task(p.id, ada.id, 1000)).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let store = MemoryStore::new();
        let admin = store.create_user(user("admin")).await.unwrap();
        let ada = store.create_user(user("ada")).await.unwrap();
        let p = store.create_project(project("p"), &[ada.id, admin.id]).await.unwrap();
        store.create_task(task(p.id, ada.id, admin.id)).await.unwrap();
        let kept = store.create_task(task(p.id, admin.id, admin.id)).await.unwrap();

        assert!(store.delete_user(ada.id).await.unwrap());

        assert!(store.find_membership(p.id, ada.id).await.unwrap().is_none());
        assert!(store.find_membership(p.id, admin.id).await.unwrap().is_some());
        let tasks = store.list_tasks().await.unwrap();
        assert_eq!(tasks, vec![kept]);
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let store = MemoryStore::new();
        let ada = store.create_user(user("ada")).await.unwrap();
        let p = store.create_project(project("p"), &[ada.id]).await.unwrap();
        let other = store.create_project(project("q"), &[ada.id]).await.unwrap();
        store.create_task(task(p.id, ada.id, ada.id)).await.unwrap();

        assert!(store.delete_project(p.id).await.unwrap());
        assert!(!store.delete_project(p.id).await.unwrap());

        assert!(store.list_project_members(p.id).await.unwrap().is_empty());
        assert!(store.list_tasks().await.unwrap().is_empty());
        assert_eq!(store.list_project_members(other.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_touches_only_status() {
        let store = MemoryStore::new();
        let ada = store.create_user(user("ada")).await.unwrap();
        let p = store.create_project(project("p"), &[]).await.unwrap();
        let before = store.create_task(task(p.id, ada.id, 5)).await.unwrap();

        let after = store
            .update_task_status(before.id, &TaskStatus::new("InProgress"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(after.status.as_str(), "InProgress");
        assert_eq!(after.title, before.title);
        assert_eq!(after.user_id, before.user_id);
        assert_eq!(after.assigned_by_id, before.assigned_by_id);
        assert_eq!(after.project_id, before.project_id);

        assert!(store
            .update_task_status(999, &TaskStatus::done())
            .await
            .unwrap()
            .is_none());
    }
}
