//! Core error types for agentforge-core.
//!
//! [`CoreError`] covers configuration validation; [`AgentError`] is what an
//! agent run or agent construction reports back to the caller.

use thiserror::Error;

/// Validation errors for agent configurations and session parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A required field was absent from a create/import payload.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A tool identifier is not in the tool registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A field is present but out of range.
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A session was requested for an agent type that does not exist.
    #[error("Invalid agent type: {0}")]
    InvalidAgentType(String),
}

/// Failures surfaced by an [`Agent`](crate::agent::Agent) or an
/// [`AgentFactory`](crate::agent::AgentFactory).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    /// No usable LLM provider settings are available.
    #[error("LLM provider is not configured: {0}")]
    NotConfigured(String),

    /// The model provider rejected or failed the request.
    #[error("provider error: {0}")]
    Provider(String),

    /// The agent failed for any other reason.
    #[error("{0}")]
    Failed(String),
}
