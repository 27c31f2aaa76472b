//! Default [`AgentFactory`]: agents that answer through an OpenAI-compatible
//! chat completions endpoint.
//!
//! The planning and tool-calling loop belongs to the agent runtime. These
//! agents make a single completion call per run, with the configured system
//! prompt and a summary of their tools.

use std::sync::Arc;

use async_trait::async_trait;

use agentforge_core::{Agent, AgentConfig, AgentError, AgentFactory, AgentType, ToolCollection};

use crate::llm_provider::{run_external_chat, ChatRequest, LlmSettings};

pub struct LlmAgent {
    name: String,
    system_prompt: String,
    temperature: Option<f64>,
    max_steps: u32,
    tools: ToolCollection,
    llm: LlmSettings,
    client: reqwest::Client,
}

impl LlmAgent {
    fn composed_system_prompt(&self) -> String {
        let mut prompt = self.system_prompt.clone();
        if !self.tools.is_empty() {
            prompt.push_str("\n\nAvailable tools:\n");
            prompt.push_str(&self.tools.summary());
        }
        prompt.push_str(&format!(
            "\n\nComplete the task within {} steps.",
            self.max_steps
        ));
        prompt
    }
}

#[async_trait]
impl Agent for LlmAgent {
    async fn run(&self, prompt: &str) -> Result<String, AgentError> {
        tracing::info!(agent = %self.name, "running agent");
        let system_prompt = self.composed_system_prompt();
        run_external_chat(
            &self.client,
            &self.llm,
            ChatRequest {
                system_prompt: Some(&system_prompt),
                user_message: prompt,
                temperature: self.temperature,
            },
        )
        .await
    }

    async fn cleanup(&self) {
        self.tools.cleanup().await;
        tracing::debug!(agent = %self.name, "agent cleaned up");
    }
}

/// Builds [`LlmAgent`]s from stored configs and from session agent types.
pub struct LlmAgentFactory {
    defaults: LlmSettings,
    client: reqwest::Client,
}

impl LlmAgentFactory {
    pub fn new(defaults: LlmSettings) -> Self {
        LlmAgentFactory {
            defaults,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AgentFactory for LlmAgentFactory {
    fn build_configured(&self, config: &AgentConfig) -> Result<Arc<dyn Agent>, AgentError> {
        let tools = ToolCollection::from_ids(config.tools.as_slice())
            .map_err(|err| AgentError::Failed(err.to_string()))?;
        Ok(Arc::new(LlmAgent {
            name: config.name.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: Some(config.temperature),
            max_steps: config.max_steps,
            tools,
            llm: self.defaults.overridden_by(&config.llm_config),
            client: self.client.clone(),
        }))
    }

    async fn build_session(&self, agent_type: AgentType) -> Result<Arc<dyn Agent>, AgentError> {
        // Session agents have no per-agent overrides, so an unconfigured
        // provider can never succeed; fail the session up front.
        if !self.defaults.is_configured() {
            return Err(AgentError::NotConfigured(
                "set AGENTFORGE_LLM_PROVIDER, AGENTFORGE_LLM_MODEL and AGENTFORGE_LLM_API_KEY"
                    .to_string(),
            ));
        }
        let tools = ToolCollection::from_ids(agent_type.default_tools())
            .map_err(|err| AgentError::Failed(err.to_string()))?;
        Ok(Arc::new(LlmAgent {
            name: agent_type.as_str().to_string(),
            system_prompt: agent_type.system_prompt().to_string(),
            temperature: None,
            max_steps: agentforge_core::config::DEFAULT_MAX_STEPS,
            tools,
            llm: self.defaults.clone(),
            client: self.client.clone(),
        }))
    }
}
