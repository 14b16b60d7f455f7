//! Liveness and health endpoints

use axum::Json;
use serde::Serialize;

/// Static liveness payload served at the root path
#[derive(Debug, Serialize)]
pub struct RootStatusResponse {
    pub message: String,
    pub status: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /
///
/// Liveness probe with a static status payload.
pub async fn root_status() -> Json<RootStatusResponse> {
    Json(RootStatusResponse {
        message: "CSV migration API active".to_string(),
        status: "OK".to_string(),
    })
}

/// GET /health
///
/// Health check endpoint for monitoring.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "csvmig-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
