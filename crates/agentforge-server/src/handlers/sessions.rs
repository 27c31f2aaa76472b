//! Chat session handlers.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use agentforge_core::AgentType;

use super::{optional_json, parse_session_id};
use crate::error::ApiError;
use crate::schema::sessions::{
    ChatRequest, ChatResponse, CloseSessionResponse, CreateSessionRequest,
    CreateSessionResponse, MessagesResponse,
};
use crate::sessions::SessionStatus;
use crate::state::AppState;

/// `POST /api/session/create`
pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let req: CreateSessionRequest = optional_json(&body)?;
    let agent_type = match req.agent_type.as_deref() {
        Some(name) => name.parse::<AgentType>()?,
        None => AgentType::default(),
    };

    let session_id = state.sessions.create(agent_type);
    Ok(Json(CreateSessionResponse {
        session_id,
        agent_type,
        status: "initializing",
    }))
}

/// `GET /api/session/{id}/status`
pub async fn session_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatus>, ApiError> {
    let id = parse_session_id(&id)?;
    Ok(Json(state.sessions.status(id).await?))
}

/// `POST /api/session/{id}/chat`
///
/// Only submits the message; the reply shows up in the session mailbox.
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let Json(req) = payload?;
    state.sessions.chat(id, req.message.trim().to_string()).await?;
    Ok(Json(ChatResponse {
        status: "processing",
        message: "Request submitted successfully",
    }))
}

/// `GET /api/session/{id}/messages`
pub async fn messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let (messages, is_processing) = state.sessions.messages(id).await?;
    Ok(Json(MessagesResponse {
        messages,
        is_processing,
    }))
}

/// `POST /api/session/{id}/close`
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CloseSessionResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    state.sessions.close(id).await?;
    Ok(Json(CloseSessionResponse {
        status: "Session closed successfully",
    }))
}
