//! Schema types for the chat session API.

use serde::{Deserialize, Serialize};

use agentforge_core::{AgentType, SessionId};

use crate::sessions::MailboxMessage;

/// Request to `POST /api/session/create`. The body is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Agent kind name. Defaults to `manus`; parsed by the handler so an
    /// unknown name gets a descriptive error.
    #[serde(default)]
    pub agent_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
    pub agent_type: AgentType,
    /// Always `"initializing"`: the agent is built in the background.
    pub status: &'static str,
}

/// Request to `POST /api/session/{id}/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Response to `GET /api/session/{id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesResponse {
    /// Entries delivered since the previous call, oldest first.
    pub messages: Vec<MailboxMessage>,
    /// Whether a run is still in flight.
    pub is_processing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseSessionResponse {
    pub status: &'static str,
}
