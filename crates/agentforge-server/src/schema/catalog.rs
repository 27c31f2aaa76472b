//! Schema types for the static catalogs: tools, templates, agent types.

use serde::Serialize;

use agentforge_core::registry::{TemplateDescriptor, ToolDescriptor};
use agentforge_core::AgentType;

#[derive(Debug, Clone, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<TemplateDescriptor>,
}

/// One agent kind a chat session can be opened with.
#[derive(Debug, Clone, Serialize)]
pub struct AgentTypeView {
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<AgentType> for AgentTypeView {
    fn from(agent_type: AgentType) -> Self {
        AgentTypeView {
            agent_type,
            name: agent_type.display_name(),
            description: agent_type.description(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentTypesResponse {
    pub agent_types: Vec<AgentTypeView>,
}
