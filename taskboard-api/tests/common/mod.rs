//! Common test utilities for API tests
//!
//! Builds the full router on top of a `MemoryStore`, seeds an administrator
//! and a regular user, and mints tokens for them without going through
//! password hashing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::auth::jwt::{create_token, Claims, Role};
use taskboard_shared::models::user::{CreateUser, User};
use taskboard_shared::store::{EntityStore, MemoryStore};
use tower::Service as _;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: MemoryStore,
    pub app: axum::Router,
    pub config: Config,
    pub admin: User,
    pub user: User,
    pub admin_token: String,
    pub user_token: String,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgresql://unused/unused"),
        ("JWT_SECRET", JWT_SECRET),
        ("CORS_ORIGINS", "*"),
    ]);

    Config::from_vars(|key| vars.get(key).map(|v| v.to_string())).expect("test config")
}

impl TestContext {
    /// Creates a context with an admin (`alice`) and a user (`bob`)
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let config = test_config();

        let admin = seed_user(&store, "alice", true).await;
        let user = seed_user(&store, "bob", false).await;

        let app = build_router(AppState::new(Arc::new(store.clone()), config.clone()));

        let mut ctx = Self {
            store,
            app,
            config,
            admin_token: String::new(),
            user_token: String::new(),
            admin,
            user,
        };
        ctx.admin_token = ctx.token_for(&ctx.admin);
        ctx.user_token = ctx.token_for(&ctx.user);
        ctx
    }

    /// Mints a valid token for a user record
    pub fn token_for(&self, user: &User) -> String {
        let role = if user.is_admin { Role::Admin } else { Role::User };
        let claims = Claims::new(user.id, user.name.clone(), role, &self.config.jwt_settings());
        create_token(&claims, &self.config.jwt_settings()).expect("token")
    }

    /// Seeds another account directly in the store
    pub async fn add_user(&self, name: &str, is_admin: bool) -> User {
        seed_user(&self.store, name, is_admin).await
    }

    /// Sends a request with an optional bearer token and JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Creates a project through the store with the given members
    pub async fn project_with(&self, members: &[i64]) -> i64 {
        self.store
            .create_project(
                taskboard_shared::models::project::CreateProject {
                    name: "Website".to_string(),
                    description: "Marketing site".to_string(),
                },
                members,
            )
            .await
            .unwrap()
            .id
    }
}

async fn seed_user(store: &MemoryStore, name: &str, is_admin: bool) -> User {
    store
        .create_user(CreateUser {
            name: name.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            email: None,
            bio: None,
            is_admin,
        })
        .await
        .unwrap()
}
