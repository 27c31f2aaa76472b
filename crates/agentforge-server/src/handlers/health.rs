//! Health check and unknown-route handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::error::ApiError;
use crate::schema::health::HealthResponse;
use crate::state::AppState;

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        agents_count: state.agent_config_store.len().await,
        active_instances: state.instances.len(),
        active_sessions: state.sessions.len(),
        timestamp: Utc::now(),
    })
}

/// Fallback for every unrouted path.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}
