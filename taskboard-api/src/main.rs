//! # Taskboard API Server
//!
//! Task-tracking backend: users, projects, memberships and tasks whose
//! status changes are restricted to the assignee, with closing reserved to
//! the admin who assigned the task.
//!
//! ## Startup
//!
//! 1. Initialize tracing
//! 2. Load configuration from the environment
//! 3. Connect to PostgreSQL and run embedded migrations
//! 4. Create the bootstrap administrator when configured
//! 5. Serve until Ctrl+C or SIGTERM
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    services::users::ensure_admin,
    store::PgStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = create_pool(
        DatabaseConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool).await.context("Failed to run migrations")?;

    let store = Arc::new(PgStore::new(pool.clone()));

    if let Some(admin) = &config.bootstrap_admin {
        let user = ensure_admin(&*store, &admin.name, &admin.password)
            .await
            .context("Failed to create bootstrap administrator")?;
        tracing::info!(user_id = user.id, name = %user.name, "Bootstrap administrator ready");
    }

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool");
    close_pool(pool).await;

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
