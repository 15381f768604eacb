/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```
///
/// Always answers 200; a failed store ping reports `degraded`.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store ping failed");
            false
        }
    };

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    }))
}
