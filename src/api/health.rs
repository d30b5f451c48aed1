//! Health check endpoint

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when every dependency answers, `degraded` otherwise
    pub status: String,
    /// `connected` or `disconnected`
    pub database: String,
    /// Storage backend in use
    pub backend: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint (also checks database connectivity)
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let repository = &state.services.repository;

    let database_ok = match repository.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            false
        }
    };

    Json(HealthResponse {
        status: if database_ok { "healthy" } else { "degraded" }.to_string(),
        database: if database_ok { "connected" } else { "disconnected" }.to_string(),
        backend: repository.backend_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}
