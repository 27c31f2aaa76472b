//! Bounded execution of agent runs.
//!
//! Every agent run in the process goes through [`AgentRunner`]: a semaphore
//! caps how many are in flight, and excess requests are turned away instead of
//! queued. Synchronous callers get a timeout that aborts the run task.
//! Dropping the caller's future (client disconnect) aborts it too.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinHandle};

use agentforge_core::{Agent, AgentError};

use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Agent capacity exhausted, retry later")]
    Saturated,

    #[error("Agent run timed out")]
    TimedOut,

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("Agent run aborted: {0}")]
    Aborted(String),
}

impl From<JoinError> for RunError {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            RunError::Aborted("cancelled".to_string())
        } else {
            RunError::Aborted("agent panicked".to_string())
        }
    }
}

impl From<RunError> for ApiError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Saturated => ApiError::ServiceUnavailable(err.to_string()),
            RunError::TimedOut => ApiError::Timeout(err.to_string()),
            RunError::Agent(agent_err) => agent_err.into(),
            RunError::Aborted(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

pub struct AgentRunner {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    timeout: Duration,
}

impl AgentRunner {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        AgentRunner {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of runs currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.permits.available_permits()
    }

    /// Reserves a run slot without waiting.
    pub fn try_reserve(&self) -> Result<OwnedSemaphorePermit, RunError> {
        Arc::clone(&self.permits)
            .try_acquire_owned()
            .map_err(|_| RunError::Saturated)
    }

    /// Starts a run on the runtime. The slot is released when the run ends,
    /// whether it finishes, fails, or is aborted.
    pub fn spawn(
        &self,
        permit: OwnedSemaphorePermit,
        agent: Arc<dyn Agent>,
        prompt: String,
    ) -> JoinHandle<Result<String, AgentError>> {
        tokio::spawn(async move {
            let _permit = permit;
            agent.run(&prompt).await
        })
    }

    /// Runs to completion or until the configured timeout, whichever comes
    /// first. On timeout the run task is aborted.
    pub async fn run_with_timeout(
        &self,
        agent: Arc<dyn Agent>,
        prompt: String,
    ) -> Result<String, RunError> {
        let permit = self.try_reserve()?;
        let mut task = AbortOnDrop(self.spawn(permit, agent, prompt));

        match tokio::time::timeout(self.timeout, &mut task.0).await {
            Ok(joined) => Ok(joined??),
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "agent run timed out, aborting");
                Err(RunError::TimedOut)
            }
        }
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
