//! Router assembly for the agentforge HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. Unrouted paths get a JSON 404.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Catalogs
        .route("/api/tools", get(handlers::catalog::list_tools))
        .route("/api/templates", get(handlers::catalog::list_templates))
        .route("/api/agent-types", get(handlers::catalog::list_agent_types))
        // Agent configurations
        .route("/api/agent/create", post(handlers::agents::create_agent))
        .route("/api/agent/import", post(handlers::agents::import_agent))
        .route(
            "/api/agent/{id}",
            get(handlers::agents::get_agent)
                .put(handlers::agents::update_agent)
                .delete(handlers::agents::delete_agent),
        )
        .route("/api/agents", get(handlers::agents::list_agents))
        .route("/api/agent/{id}/test", post(handlers::agents::test_agent))
        .route("/api/agent/{id}/export", get(handlers::agents::export_agent))
        .route("/api/agent/{id}/deploy", post(handlers::agents::deploy_agent))
        // Chat sessions
        .route("/api/session/create", post(handlers::sessions::create_session))
        .route(
            "/api/session/{id}/status",
            get(handlers::sessions::session_status),
        )
        .route("/api/session/{id}/chat", post(handlers::sessions::chat))
        .route(
            "/api/session/{id}/messages",
            get(handlers::sessions::messages),
        )
        .route(
            "/api/session/{id}/close",
            post(handlers::sessions::close_session),
        )
        // One-shot
        .route("/process", post(handlers::process::process))
        .fallback(handlers::health::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
