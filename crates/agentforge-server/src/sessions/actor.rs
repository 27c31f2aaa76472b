//! The task that owns one chat session.
//!
//! All session state lives here and is touched only from the actor loop.
//! Agent construction and agent runs happen on their own tasks and report
//! back through the session's command channel, so a slow agent never stalls
//! status or mailbox requests.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;

use agentforge_core::{Agent, AgentError, AgentFactory, AgentType, SessionId};

use super::{ChatRejection, MailboxMessage, SessionHandle, SessionStatus};
use crate::agent_runner::{AgentRunner, RunError};

pub(crate) const EMPTY_RESULT: &str = "Agent completed the task successfully.";

pub(crate) enum SessionCommand {
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
    Chat {
        message: String,
        reply: oneshot::Sender<Result<(), ChatRejection>>,
    },
    Drain {
        reply: oneshot::Sender<(Vec<MailboxMessage>, bool)>,
    },
    Close {
        done: oneshot::Sender<()>,
    },
    AgentReady(Result<Arc<dyn Agent>, AgentError>),
    RunFinished(Result<String, RunError>),
}

pub(crate) struct SessionActor {
    id: SessionId,
    agent_type: AgentType,
    created_at: DateTime<Utc>,
    agent: Option<Arc<dyn Agent>>,
    mailbox: VecDeque<MailboxMessage>,
    init: Option<AbortHandle>,
    running: Option<AbortHandle>,
    runner: Arc<AgentRunner>,
    sessions: Arc<DashMap<SessionId, SessionHandle>>,
    commands: mpsc::Receiver<SessionCommand>,
    loopback: mpsc::WeakSender<SessionCommand>,
}

impl SessionActor {
    /// Registers the session in `sessions`, then spawns the actor and the
    /// task that builds its agent.
    pub(crate) fn spawn(
        id: SessionId,
        agent_type: AgentType,
        factory: Arc<dyn AgentFactory>,
        runner: Arc<AgentRunner>,
        sessions: Arc<DashMap<SessionId, SessionHandle>>,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::channel(32);
        let handle = SessionHandle {
            commands: tx,
            agent_type,
            created_at: Utc::now(),
        };
        // Registered before init starts so a fast failure can unregister it.
        sessions.insert(id, handle.clone());

        let loopback = handle.commands.downgrade();
        let init_tx = loopback.clone();
        let init = tokio::spawn(async move {
            let built = factory.build_session(agent_type).await;
            if let Some(tx) = init_tx.upgrade() {
                let _ = tx.send(SessionCommand::AgentReady(built)).await;
            }
        });

        let actor = SessionActor {
            id,
            agent_type,
            created_at: handle.created_at,
            agent: None,
            mailbox: VecDeque::new(),
            init: Some(init.abort_handle()),
            running: None,
            runner,
            sessions,
            commands: rx,
            loopback,
        };
        tokio::spawn(actor.run());

        handle
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                SessionCommand::Status { reply } => {
                    let _ = reply.send(self.status());
                }
                SessionCommand::Chat { message, reply } => {
                    let _ = reply.send(self.start_run(message));
                }
                SessionCommand::Drain { reply } => {
                    let drained = self.mailbox.drain(..).collect();
                    let _ = reply.send((drained, self.running.is_some()));
                }
                SessionCommand::AgentReady(Ok(agent)) => {
                    self.init = None;
                    self.agent = Some(agent);
                    tracing::info!(session_id = %self.id, agent_type = %self.agent_type, "session agent ready");
                }
                SessionCommand::AgentReady(Err(err)) => {
                    tracing::error!(session_id = %self.id, error = %err, "session agent failed to initialize");
                    self.sessions.remove(&self.id);
                    return;
                }
                SessionCommand::RunFinished(outcome) => {
                    self.running = None;
                    self.mailbox.push_back(mailbox_entry(outcome));
                }
                SessionCommand::Close { done } => {
                    self.shutdown().await;
                    let _ = done.send(());
                    return;
                }
            }
        }
        // Every strong sender is gone: the manager dropped the session.
        self.shutdown().await;
    }

    fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.id,
            agent_type: self.agent_type,
            is_processing: self.running.is_some(),
            agent_ready: self.agent.is_some(),
            created_at: self.created_at,
        }
    }

    fn start_run(&mut self, message: String) -> Result<(), ChatRejection> {
        let agent = self.agent.as_ref().ok_or(ChatRejection::NotReady)?;
        if self.running.is_some() {
            return Err(ChatRejection::Busy);
        }
        if message.trim().is_empty() {
            return Err(ChatRejection::EmptyMessage);
        }
        let permit = self
            .runner
            .try_reserve()
            .map_err(|_| ChatRejection::Saturated)?;

        let task = self.runner.spawn(permit, Arc::clone(agent), message);
        self.running = Some(task.abort_handle());

        let loopback = self.loopback.clone();
        tokio::spawn(async move {
            let outcome = match task.await {
                Ok(result) => result.map_err(RunError::from),
                Err(join_err) => Err(RunError::from(join_err)),
            };
            if let Some(tx) = loopback.upgrade() {
                let _ = tx.send(SessionCommand::RunFinished(outcome)).await;
            }
        });

        tracing::debug!(session_id = %self.id, "session run started");
        Ok(())
    }

    async fn shutdown(&mut self) {
        if let Some(init) = self.init.take() {
            init.abort();
        }
        if let Some(running) = self.running.take() {
            running.abort();
            tracing::info!(session_id = %self.id, "in-flight run aborted");
        }
        if let Some(agent) = self.agent.take() {
            agent.cleanup().await;
        }
        tracing::info!(session_id = %self.id, "session closed");
    }
}

fn mailbox_entry(outcome: Result<String, RunError>) -> MailboxMessage {
    match outcome {
        Ok(text) if text.trim().is_empty() => MailboxMessage::response(EMPTY_RESULT),
        Ok(text) => MailboxMessage::response(text),
        Err(err) => MailboxMessage::error(format!("Error: {}", err)),
    }
}
