//! Application state shared by all handlers.
//!
//! [`AppState`] is cheap to clone: every component sits behind an `Arc` and
//! does its own locking. The config store uses an async mutex, the instance
//! cache and session table are `DashMap`s, and each session's state is owned
//! by its actor task.

use std::sync::Arc;
use std::time::Duration;

use agentforge_core::{AgentFactory, ConfigPersistence, InMemoryBackend, JsonFileBackend};

use crate::agent_config_store::AgentConfigStore;
use crate::agent_runner::AgentRunner;
use crate::config::{ServerConfig, DEFAULT_MAX_CONCURRENT_RUNS, DEFAULT_TEST_TIMEOUT};
use crate::error::ApiError;
use crate::instances::InstanceCache;
use crate::llm_agent::LlmAgentFactory;
use crate::llm_provider::LlmSettings;
use crate::sessions::SessionManager;

#[derive(Clone)]
pub struct AppState {
    /// Stored agent configurations, persisted on every mutation.
    pub agent_config_store: Arc<AgentConfigStore>,
    /// Agents built from stored configs, reused across test runs.
    pub instances: Arc<InstanceCache>,
    /// Open chat sessions.
    pub sessions: Arc<SessionManager>,
    /// Bounds and times agent runs.
    pub runner: Arc<AgentRunner>,
    /// Builds agents for configs, sessions and one-shot prompts.
    pub factory: Arc<dyn AgentFactory>,
}

impl AppState {
    /// State backed by the JSON store file and LLM agents, as configured.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        Self::with_parts(
            Box::new(JsonFileBackend::new(config.store_path.clone())),
            Arc::new(LlmAgentFactory::new(config.llm.clone())),
            AgentRunner::new(config.max_concurrent_runs, config.run_timeout),
        )
    }

    /// In-memory state with an unconfigured LLM factory (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        Self::with_parts(
            Box::new(InMemoryBackend::new()),
            Arc::new(LlmAgentFactory::new(LlmSettings::default())),
            AgentRunner::new(DEFAULT_MAX_CONCURRENT_RUNS, DEFAULT_TEST_TIMEOUT),
        )
    }

    pub fn with_parts(
        backend: Box<dyn ConfigPersistence>,
        factory: Arc<dyn AgentFactory>,
        runner: AgentRunner,
    ) -> Result<Self, ApiError> {
        let agent_config_store = Arc::new(AgentConfigStore::new(backend)?);
        let runner = Arc::new(runner);
        let sessions = Arc::new(SessionManager::new(
            Arc::clone(&factory),
            Arc::clone(&runner),
        ));

        Ok(AppState {
            agent_config_store,
            instances: Arc::new(InstanceCache::new()),
            sessions,
            runner,
            factory,
        })
    }

    /// Closes every session and cleans up every cached agent. Runs still in
    /// flight get `grace` to finish before the caller moves on.
    pub async fn shutdown(&self, grace: Duration) {
        self.sessions.close_all().await;
        self.instances.clear().await;

        let deadline = tokio::time::Instant::now() + grace;
        while self.runner.in_flight() > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tracing::info!(in_flight = self.runner.in_flight(), "shutdown complete");
    }
}
