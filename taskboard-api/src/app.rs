/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::AppState, config::Config};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::store::PgStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::new(config.database.url.clone())).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use taskboard_shared::auth::{jwt::JwtSettings, middleware::authenticate_bearer};
use taskboard_shared::store::EntityStore;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Entity store (PostgreSQL in production, in-memory in tests)
    pub store: Arc<dyn EntityStore>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token settings derived from the configuration
    pub jwt: Arc<JwtSettings>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn EntityStore>, config: Config) -> Self {
        let jwt = Arc::new(config.jwt_settings());

        Self {
            store,
            config: Arc::new(config),
            jwt,
        }
    }

    /// Borrows the store as a trait object
    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    /// Gets token settings for issuing and validating tokens
    pub fn jwt_settings(&self) -> &JwtSettings {
        &self.jwt
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                          public
/// └── /api
///     ├── /users
///     │   ├── POST   /register               public
///     │   ├── POST   /login                  public
///     │   ├── GET    /                       user
///     │   ├── POST   /                       admin
///     │   ├── GET    /:id                    user
///     │   ├── PUT    /:id                    self or admin
///     │   └── DELETE /:id                    admin
///     ├── /projects
///     │   ├── GET    /                       public
///     │   ├── POST   /                       admin
///     │   ├── GET    /:id                    user
///     │   ├── DELETE /:id                    admin
///     │   ├── GET    /:id/tasks              user
///     │   ├── POST   /:id/members            admin
///     │   └── DELETE /:id/members/:user_id   admin
///     └── /tasks
///         ├── GET    /                       user
///         ├── POST   /                       admin
///         ├── GET    /:id                    user
///         ├── DELETE /:id                    admin
///         └── PUT    /:id/status             assignee or assigner
/// ```
///
/// Authenticated routes sit behind [`jwt_auth_layer`]; role checks happen in
/// the handlers.
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/users/register", post(routes::users::register))
        .route("/api/users/login", post(routes::users::login))
        .route("/api/projects", get(routes::projects::list_projects));

    let protected_routes = Router::new()
        .route("/api/users", get(routes::users::list_users))
        .route("/api/users", post(routes::users::create_user))
        .route("/api/users/:id", get(routes::users::get_user))
        .route("/api/users/:id", put(routes::users::update_user))
        .route("/api/users/:id", delete(routes::users::delete_user))
        .route("/api/projects", post(routes::projects::create_project))
        .route("/api/projects/:id", get(routes::projects::get_project))
        .route("/api/projects/:id", delete(routes::projects::delete_project))
        .route("/api/projects/:id/tasks", get(routes::tasks::list_project_tasks))
        .route("/api/projects/:id/members", post(routes::projects::add_member))
        .route(
            "/api/projects/:id/members/:user_id",
            delete(routes::projects::remove_member),
        )
        .route("/api/tasks", get(routes::tasks::list_tasks))
        .route("/api/tasks", post(routes::tasks::create_task))
        .route("/api/tasks/:id", get(routes::tasks::get_task))
        .route("/api/tasks/:id", delete(routes::tasks::delete_task))
        .route("/api/tasks/:id/status", put(routes::tasks::update_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

/// Builds the CORS layer; `*` in the origin list means permissive
fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    if cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects the caller's `AuthContext` into
/// request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate_bearer(req.headers(), state.jwt_settings())?;

    tracing::debug!(user_id = auth_context.user_id, role = %auth_context.role, "Request authenticated");

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
