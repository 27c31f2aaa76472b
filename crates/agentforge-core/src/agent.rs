//! The agent runtime seam.
//!
//! The server never plans or calls tools itself. It asks an [`AgentFactory`]
//! for an [`Agent`] and awaits [`Agent::run`]. Implementations must be
//! `Send + Sync`: a run executes on a runtime worker task while the owning
//! session keeps answering status queries.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::error::{AgentError, CoreError};

#[async_trait]
pub trait Agent: Send + Sync {
    /// Drives the agent to completion for one prompt and returns its final text.
    async fn run(&self, prompt: &str) -> Result<String, AgentError>;

    /// Releases anything the agent holds open. Called once when the agent is
    /// discarded.
    async fn cleanup(&self) {}
}

/// Kinds of agent a chat session can be opened with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    #[default]
    Manus,
    Mcp,
    DataAnalysis,
}

impl AgentType {
    pub const ALL: [AgentType; 3] = [AgentType::Manus, AgentType::Mcp, AgentType::DataAnalysis];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentType::Manus => "manus",
            AgentType::Mcp => "mcp",
            AgentType::DataAnalysis => "data_analysis",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AgentType::Manus => "Manus Agent",
            AgentType::Mcp => "MCP Agent",
            AgentType::DataAnalysis => "Data Analysis Agent",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgentType::Manus => "General-purpose AI agent for various tasks",
            AgentType::Mcp => "Model Context Protocol agent with enhanced tool support",
            AgentType::DataAnalysis => "Specialized agent for data analysis and visualization",
        }
    }

    /// Tool ids a session agent of this kind is equipped with.
    pub fn default_tools(self) -> &'static [&'static str] {
        match self {
            AgentType::Manus => &[
                "python_execute",
                "browser_use",
                "str_replace_editor",
                "web_search",
                "terminate",
            ],
            AgentType::Mcp => &["terminate"],
            AgentType::DataAnalysis => &["python_execute", "str_replace_editor", "terminate"],
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            AgentType::Manus => "You are a versatile agent that can solve any task presented by the user using the tools available to you.",
            AgentType::Mcp => "You are an agent with access to tools exposed by Model Context Protocol servers. Use them to complete the user's request.",
            AgentType::DataAnalysis => "You are a data analysis specialist. You load, clean and analyze data, and explain the results with charts and concise summaries.",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::InvalidAgentType(s.to_string()))
    }
}

/// Produces agents for configured builds and for chat sessions.
#[async_trait]
pub trait AgentFactory: Send + Sync {
    /// Builds an agent from a stored configuration. Must not block.
    fn build_configured(&self, config: &AgentConfig) -> Result<Arc<dyn Agent>, AgentError>;

    /// Builds a session agent. May be slow (connections, handshakes); callers
    /// run it off the request path.
    async fn build_session(&self, agent_type: AgentType) -> Result<Arc<dyn Agent>, AgentError>;
}
