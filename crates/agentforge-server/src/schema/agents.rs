//! Schema types for the agent configuration API.

use serde::{Deserialize, Serialize};

use agentforge_core::{AgentConfig, AgentId, AgentSummary};

/// Response to `POST /api/agent/create` and `POST /api/agent/import`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAgentResponse {
    /// Id assigned to the stored config.
    pub agent_id: AgentId,
    /// The stored record, including defaults filled in on creation.
    pub config: AgentConfig,
    pub message: String,
}

/// Response to `GET /api/agent/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub config: AgentConfig,
}

/// Response to `PUT /api/agent/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateAgentResponse {
    /// The merged record as stored.
    pub config: AgentConfig,
    pub message: String,
}

/// Body of responses that only carry a status message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response to `GET /api/agents`.
#[derive(Debug, Clone, Serialize)]
pub struct ListAgentsResponse {
    /// Summaries ordered by creation time.
    pub agents: Vec<AgentSummary>,
}

/// Request to `POST /api/agent/{id}/test`. The body is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestAgentRequest {
    /// Prompt to run. A built-in introduction prompt is used when absent.
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Response to a test run that finished in time.
#[derive(Debug, Clone, Serialize)]
pub struct TestAgentResponse {
    /// Final text the agent produced.
    pub result: String,
    pub message: String,
}

/// Response to `POST /api/agent/{id}/deploy`.
#[derive(Debug, Clone, Serialize)]
pub struct DeployAgentResponse {
    /// Source of a standalone script that runs the agent.
    pub deployment_code: String,
    /// Suggested file name for the script.
    pub filename: String,
    pub message: String,
}
