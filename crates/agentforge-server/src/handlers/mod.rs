//! HTTP handler modules for the agentforge API.
//!
//! Handlers are thin: they parse path ids and bodies, delegate to the store,
//! the instance cache, the session manager or the runner held in
//! [`AppState`](crate::state::AppState), and wrap results in schema types.

pub mod agents;
pub mod catalog;
pub mod health;
pub mod process;
pub mod sessions;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use agentforge_core::{AgentId, SessionId};

use crate::agent_config_store::agent_not_found;
use crate::error::ApiError;
use crate::sessions::session_not_found;

/// Parses a JSON body that clients may omit entirely.
pub(crate) fn optional_json<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid JSON body: {}", err)))
}

/// Path ids that are not UUIDs cannot name a stored agent.
pub(crate) fn parse_agent_id(raw: &str) -> Result<AgentId, ApiError> {
    raw.parse().map_err(|_| agent_not_found())
}

pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse().map_err(|_| session_not_found())
}
