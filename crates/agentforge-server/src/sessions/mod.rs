//! Chat sessions over long-lived agents.
//!
//! [`SessionManager`] maps session ids to handles of per-session actors (see
//! [`actor`]). A chat request only submits work: the run proceeds in the
//! background and its outcome lands in the session mailbox, which the client
//! polls and drains.

mod actor;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use agentforge_core::{AgentFactory, AgentType, SessionId};

use crate::agent_runner::AgentRunner;
use crate::error::ApiError;
use actor::{SessionActor, SessionCommand};

/// Kind of a mailbox entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Response,
    Error,
}

/// One completed run, as delivered to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailboxMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl MailboxMessage {
    fn response(content: impl Into<String>) -> Self {
        MailboxMessage {
            kind: MessageKind::Response,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    fn error(content: impl Into<String>) -> Self {
        MailboxMessage {
            kind: MessageKind::Error,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub session_id: SessionId,
    pub agent_type: AgentType,
    pub is_processing: bool,
    pub agent_ready: bool,
    pub created_at: DateTime<Utc>,
}

/// Why a session refused a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChatRejection {
    #[error("Agent not ready yet")]
    NotReady,
    #[error("Agent is currently processing another request")]
    Busy,
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("Agent capacity exhausted, retry later")]
    Saturated,
}

impl From<ChatRejection> for ApiError {
    fn from(rejection: ChatRejection) -> Self {
        let message = rejection.to_string();
        match rejection {
            ChatRejection::NotReady | ChatRejection::EmptyMessage => ApiError::BadRequest(message),
            ChatRejection::Busy => ApiError::TooManyRequests(message),
            ChatRejection::Saturated => ApiError::ServiceUnavailable(message),
        }
    }
}

#[derive(Clone)]
pub(crate) struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    agent_type: AgentType,
    created_at: DateTime<Utc>,
}

pub struct SessionManager {
    sessions: Arc<DashMap<SessionId, SessionHandle>>,
    factory: Arc<dyn AgentFactory>,
    runner: Arc<AgentRunner>,
}

impl SessionManager {
    pub fn new(factory: Arc<dyn AgentFactory>, runner: Arc<AgentRunner>) -> Self {
        SessionManager {
            sessions: Arc::new(DashMap::new()),
            factory,
            runner,
        }
    }

    /// Opens a session. The agent is built in the background; until it is
    /// ready, chat requests are refused. If building fails the session
    /// disappears.
    pub fn create(&self, agent_type: AgentType) -> SessionId {
        let id = SessionId::new();
        let handle = SessionActor::spawn(
            id,
            agent_type,
            Arc::clone(&self.factory),
            Arc::clone(&self.runner),
            Arc::clone(&self.sessions),
        );
        tracing::info!(session_id = %id, agent_type = %handle.agent_type, "session created");
        id
    }

    pub async fn status(&self, id: SessionId) -> Result<SessionStatus, ApiError> {
        self.request(id, |reply| SessionCommand::Status { reply }).await
    }

    /// Submits `message` to the session agent.
    pub async fn chat(&self, id: SessionId, message: String) -> Result<(), ApiError> {
        self.request(id, |reply| SessionCommand::Chat { message, reply })
            .await?
            .map_err(ApiError::from)
    }

    /// Takes every mailbox entry, oldest first. Also reports whether a run
    /// is still in flight.
    pub async fn messages(&self, id: SessionId) -> Result<(Vec<MailboxMessage>, bool), ApiError> {
        self.request(id, |reply| SessionCommand::Drain { reply }).await
    }

    /// Removes the session, aborts any run in flight and cleans up its agent.
    pub async fn close(&self, id: SessionId) -> Result<(), ApiError> {
        let (_, handle) = self.sessions.remove(&id).ok_or_else(session_not_found)?;
        shut_down(id, handle).await;
        Ok(())
    }

    pub async fn close_all(&self) {
        let ids: Vec<SessionId> = self.sessions.iter().map(|e| *e.key()).collect();
        for id in ids {
            if let Some((_, handle)) = self.sessions.remove(&id) {
                shut_down(id, handle).await;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    async fn request<T>(
        &self,
        id: SessionId,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, ApiError> {
        let commands = self
            .sessions
            .get(&id)
            .map(|entry| entry.commands.clone())
            .ok_or_else(session_not_found)?;

        let (reply, response) = oneshot::channel();
        commands
            .send(command(reply))
            .await
            .map_err(|_| session_not_found())?;
        // The actor dropped the reply: it exited while the request was queued.
        response.await.map_err(|_| session_not_found())
    }
}

async fn shut_down(id: SessionId, handle: SessionHandle) {
    let (done, finished) = oneshot::channel();
    if handle.commands.send(SessionCommand::Close { done }).await.is_ok() {
        let _ = finished.await;
    } else {
        tracing::debug!(session_id = %id, "session actor already gone");
    }
}

pub fn session_not_found() -> ApiError {
    ApiError::NotFound("Session not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use agentforge_core::{Agent, AgentConfig, AgentError};
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl Agent for Echo {
        async fn run(&self, prompt: &str) -> Result<String, AgentError> {
            Ok(format!("echo: {}", prompt))
        }
    }

    struct EchoFactory;

    #[async_trait]
    impl AgentFactory for EchoFactory {
        fn build_configured(&self, _config: &AgentConfig) -> Result<Arc<dyn Agent>, AgentError> {
            Ok(Arc::new(Echo))
        }

        async fn build_session(&self, _agent_type: AgentType) -> Result<Arc<dyn Agent>, AgentError> {
            Ok(Arc::new(Echo))
        }
    }

    fn manager() -> SessionManager {
        SessionManager::new(
            Arc::new(EchoFactory),
            Arc::new(AgentRunner::new(4, Duration::from_secs(5))),
        )
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let manager = manager();
        let err = manager.status(SessionId::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Session not found");
        assert!(manager.close(SessionId::new()).await.is_err());
    }

    #[tokio::test]
    async fn chat_result_lands_in_mailbox() {
        let manager = manager();
        let id = manager.create(AgentType::Manus);

        for _ in 0..200 {
            if manager.status(id).await.unwrap().agent_ready {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        manager.chat(id, "hi".to_string()).await.unwrap();

        let mut received = Vec::new();
        for _ in 0..200 {
            let (messages, _) = manager.messages(id).await.unwrap();
            received.extend(messages);
            if !received.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].kind, MessageKind::Response);
        assert_eq!(received[0].content, "echo: hi");
    }

    #[tokio::test]
    async fn close_removes_the_session() {
        let manager = manager();
        let id = manager.create(AgentType::DataAnalysis);
        assert_eq!(manager.len(), 1);

        manager.close(id).await.unwrap();
        assert!(manager.is_empty());
        assert!(manager.status(id).await.is_err());
    }

    #[test]
    fn rejections_map_to_statuses() {
        use axum::http::StatusCode;
        assert_eq!(ApiError::from(ChatRejection::NotReady).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ChatRejection::Busy).status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::from(ChatRejection::Saturated).to_string(),
            "Agent capacity exhausted, retry later"
        );
    }
}
