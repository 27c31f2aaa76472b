//! Schema types for the health endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response to `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the server answers at all.
    pub status: &'static str,
    /// Stored agent configs.
    pub agents_count: usize,
    /// Cached agents built from stored configs.
    pub active_instances: usize,
    /// Open chat sessions.
    pub active_sessions: usize,
    pub timestamp: DateTime<Utc>,
}
