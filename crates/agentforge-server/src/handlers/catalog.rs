//! Static catalog handlers.

use axum::Json;

use agentforge_core::registry::{TEMPLATES, TOOLS};
use agentforge_core::AgentType;

use crate::schema::catalog::{AgentTypeView, AgentTypesResponse, TemplatesResponse, ToolsResponse};

/// `GET /api/tools`
pub async fn list_tools() -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: TOOLS.to_vec(),
    })
}

/// `GET /api/templates`
pub async fn list_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        templates: TEMPLATES.to_vec(),
    })
}

/// `GET /api/agent-types`
pub async fn list_agent_types() -> Json<AgentTypesResponse> {
    Json(AgentTypesResponse {
        agent_types: AgentType::ALL.into_iter().map(AgentTypeView::from).collect(),
    })
}
