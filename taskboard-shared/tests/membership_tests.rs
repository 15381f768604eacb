/// Membership and project tests against the in-memory store

use async_trait::async_trait;
use taskboard_shared::error::ServiceError;
use taskboard_shared::models::membership::Membership;
use taskboard_shared::models::project::{CreateProject, Project};
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus};
use taskboard_shared::models::user::{CreateUser, UpdateUser, User};
use taskboard_shared::services::membership::{add_member, remove_member};
use taskboard_shared::services::projects::{self, NewProject};
use taskboard_shared::store::{EntityStore, MemoryStore, StoreResult};

async fn seed_user(store: &MemoryStore, name: &str) -> User {
    store
        .create_user(CreateUser {
            name: name.to_string(),
            password_hash: "unused".to_string(),
            email: None,
            bio: None,
            is_admin: false,
        })
        .await
        .unwrap()
}

async fn empty_project(store: &MemoryStore) -> i64 {
    projects::create_project(
        store,
        NewProject {
            name: "Platform".to_string(),
            description: "Infra work".to_string(),
            user_ids: vec![],
        },
    )
    .await
    .unwrap()
    .project
    .id
}

#[tokio::test]
async fn test_add_member_twice_conflicts() {
    let store = MemoryStore::new();
    let ada = seed_user(&store, "ada").await;
    let project_id = empty_project(&store).await;

    add_member(&store, project_id, ada.id).await.unwrap();
    let err = add_member(&store, project_id, ada.id).await.unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(store.list_project_members(project_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_member_missing_entities() {
    let store = MemoryStore::new();
    let ada = seed_user(&store, "ada").await;
    let project_id = empty_project(&store).await;

    let err = add_member(&store, 999, ada.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref msg) if msg.contains("Project")));

    let err = add_member(&store, project_id, 999).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref msg) if msg.contains("User")));
}

#[tokio::test]
async fn test_remove_missing_membership_leaves_storage_unchanged() {
    let store = MemoryStore::new();
    let ada = seed_user(&store, "ada").await;
    let bob = seed_user(&store, "bob").await;
    let project_id = empty_project(&store).await;
    add_member(&store, project_id, ada.id).await.unwrap();

    let err = remove_member(&store, project_id, bob.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref msg) if msg.contains("not a member")));

    let err = remove_member(&store, 999, ada.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref msg) if msg.contains("Project")));

    let members = store.list_project_members(project_id).await.unwrap();
    assert_eq!(members, vec![ada.clone()]);

    remove_member(&store, project_id, ada.id).await.unwrap();
    assert!(store.find_membership(project_id, ada.id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_yield_one_membership() {
    let store = MemoryStore::new();
    let ada = seed_user(&store, "ada").await;
    let project_id = empty_project(&store).await;
    let user_id = ada.id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { add_member(&store, project_id, user_id).await })
        })
        .collect();

    let mut ok = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(ServiceError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.list_project_members(project_id).await.unwrap().len(), 1);
}

/// Store whose membership lookup always misses, as if another request
/// inserted the row between the check and the insert
struct StaleLookupStore(MemoryStore);

#[async_trait]
impl EntityStore for StaleLookupStore {
    async fn ping(&self) -> StoreResult<()> {
        self.0.ping().await
    }
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        self.0.create_user(data).await
    }
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        self.0.find_user(id).await
    }
    async fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        self.0.find_user_by_name(name).await
    }
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.0.list_users().await
    }
    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        self.0.update_user(id, data).await
    }
    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        self.0.delete_user(id).await
    }
    async fn create_project(&self, data: CreateProject, member_ids: &[i64]) -> StoreResult<Project> {
        self.0.create_project(data, member_ids).await
    }
    async fn find_project(&self, id: i64) -> StoreResult<Option<Project>> {
        self.0.find_project(id).await
    }
    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        self.0.list_projects().await
    }
    async fn list_project_members(&self, project_id: i64) -> StoreResult<Vec<User>> {
        self.0.list_project_members(project_id).await
    }
    async fn delete_project(&self, id: i64) -> StoreResult<bool> {
        self.0.delete_project(id).await
    }
    async fn add_membership(&self, project_id: i64, user_id: i64) -> StoreResult<Membership> {
        self.0.add_membership(project_id, user_id).await
    }
    async fn find_membership(&self, _project_id: i64, _user_id: i64) -> StoreResult<Option<Membership>> {
        Ok(None)
    }
    async fn remove_membership(&self, project_id: i64, user_id: i64) -> StoreResult<bool> {
        self.0.remove_membership(project_id, user_id).await
    }
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        self.0.create_task(data).await
    }
    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        self.0.find_task(id).await
    }
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.0.list_tasks().await
    }
    async fn list_tasks_by_project(&self, project_id: i64) -> StoreResult<Vec<Task>> {
        self.0.list_tasks_by_project(project_id).await
    }
    async fn update_task_status(&self, id: i64, status: &TaskStatus) -> StoreResult<Option<Task>> {
        self.0.update_task_status(id, status).await
    }
    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        self.0.delete_task(id).await
    }
}

#[tokio::test]
async fn test_insert_conflict_after_passed_check_is_conflict() {
    let inner = MemoryStore::new();
    let ada = seed_user(&inner, "ada").await;
    let project_id = empty_project(&inner).await;
    inner.add_membership(project_id, ada.id).await.unwrap();

    let store = StaleLookupStore(inner.clone());
    let err = add_member(&store, project_id, ada.id).await.unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(inner.list_project_members(project_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleting_user_removes_memberships_but_not_project() {
    let store = MemoryStore::new();
    let ada = seed_user(&store, "ada").await;
    let bob = seed_user(&store, "bob").await;
    let details = projects::create_project(
        &store,
        NewProject {
            name: "P".to_string(),
            description: String::new(),
            user_ids: vec![ada.id, bob.id],
        },
    )
    .await
    .unwrap();

    store.delete_user(bob.id).await.unwrap();

    let after = projects::get_project(&store, details.project.id).await.unwrap();
    assert_eq!(after.project, details.project);
    assert_eq!(after.members, vec![ada]);
}

#[tokio::test]
async fn test_create_project_rejects_unknown_members() {
    let store = MemoryStore::new();
    let ada = seed_user(&store, "ada").await;

    let err = projects::create_project(
        &store,
        NewProject {
            name: "P".to_string(),
            description: String::new(),
            user_ids: vec![ada.id, 41, 42, 41],
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::BadRequest(ref msg) if msg == "Unknown user ids: 41, 42"));
    assert!(projects::list_projects(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_members_reported_in_request_order() {
    let store = MemoryStore::new();

    let err = projects::create_project(
        &store,
        NewProject {
            name: "P".to_string(),
            description: String::new(),
            user_ids: vec![42, 7, 42, 19, 7],
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::BadRequest(ref msg) if msg == "Unknown user ids: 42, 7, 19"));
}

#[tokio::test]
async fn test_create_project_ignores_duplicate_members() {
    let store = MemoryStore::new();
    let ada = seed_user(&store, "ada").await;

    let details = projects::create_project(
        &store,
        NewProject {
            name: "P".to_string(),
            description: String::new(),
            user_ids: vec![ada.id, ada.id],
        },
    )
    .await
    .unwrap();

    assert_eq!(details.members.len(), 1);
}

#[tokio::test]
async fn test_delete_project_cascades_and_reports_missing() {
    let store = MemoryStore::new();
    let ada = seed_user(&store, "ada").await;
    let project_id = empty_project(&store).await;
    add_member(&store, project_id, ada.id).await.unwrap();

    projects::delete_project(&store, project_id).await.unwrap();

    assert!(store.find_membership(project_id, ada.id).await.unwrap().is_none());
    assert!(matches!(
        projects::delete_project(&store, project_id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        projects::get_project(&store, project_id).await,
        Err(ServiceError::NotFound(_))
    ));
}
