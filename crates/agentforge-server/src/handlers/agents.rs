//! Agent configuration handlers: CRUD, test runs, export/import, deployment.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use agentforge_core::{deploy, AgentConfig, AgentDraft};

use super::{optional_json, parse_agent_id};
use crate::agent_config_store::agent_not_found;
use crate::agent_runner::RunError;
use crate::error::ApiError;
use crate::schema::agents::{
    AgentResponse, CreateAgentResponse, DeployAgentResponse, ListAgentsResponse,
    MessageResponse, TestAgentRequest, TestAgentResponse, UpdateAgentResponse,
};
use crate::state::AppState;

pub const DEFAULT_TEST_PROMPT: &str =
    "Hello! Please introduce yourself and list your capabilities.";

/// `POST /api/agent/create`
pub async fn create_agent(
    State(state): State<AppState>,
    payload: Result<Json<AgentDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateAgentResponse>), ApiError> {
    let Json(draft) = payload?;
    let config = state.agent_config_store.create(draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAgentResponse {
            agent_id: config.id,
            config,
            message: "Agent created successfully".to_string(),
        }),
    ))
}

/// `GET /api/agent/{id}`
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgentResponse>, ApiError> {
    let config = load(&state, &id).await?;
    Ok(Json(AgentResponse { config }))
}

/// `PUT /api/agent/{id}`
///
/// Fields absent from the body keep their stored values. A cached agent for
/// this id is discarded so the next test run sees the new config.
pub async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AgentDraft>, JsonRejection>,
) -> Result<Json<UpdateAgentResponse>, ApiError> {
    let id = parse_agent_id(&id)?;
    let Json(patch) = payload?;
    let config = state.agent_config_store.update(id, patch).await?;
    state.instances.invalidate(id);
    Ok(Json(UpdateAgentResponse {
        config,
        message: "Agent updated successfully".to_string(),
    }))
}

/// `DELETE /api/agent/{id}`
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_agent_id(&id)?;
    state.agent_config_store.delete(id).await?;
    state.instances.invalidate(id);
    Ok(Json(MessageResponse {
        message: "Agent deleted successfully".to_string(),
    }))
}

/// `GET /api/agents`
pub async fn list_agents(State(state): State<AppState>) -> Json<ListAgentsResponse> {
    Json(ListAgentsResponse {
        agents: state.agent_config_store.list().await,
    })
}

/// `POST /api/agent/{id}/test`
///
/// Runs one prompt against the cached agent for this config. The run is
/// aborted when it exceeds the configured test timeout.
pub async fn test_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<TestAgentResponse>, ApiError> {
    let config = load(&state, &id).await?;
    let req: TestAgentRequest = optional_json(&body)?;
    let prompt = req
        .prompt
        .unwrap_or_else(|| DEFAULT_TEST_PROMPT.to_string());
    if prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("Prompt cannot be empty".to_string()));
    }

    let agent = state
        .instances
        .get_or_build(&config, state.factory.as_ref())?;
    // A delete may have committed while the agent was being built.
    if state.agent_config_store.get(config.id).await.is_none() {
        state.instances.invalidate(config.id);
        return Err(agent_not_found());
    }
    tracing::info!(agent_id = %config.id, "running agent test");

    match state.runner.run_with_timeout(agent, prompt).await {
        Ok(result) => Ok(Json(TestAgentResponse {
            result,
            message: "Test completed successfully".to_string(),
        })),
        Err(RunError::TimedOut) => Err(ApiError::Timeout("Test timed out".to_string())),
        Err(err) => Err(err.into()),
    }
}

/// `GET /api/agent/{id}/export`
///
/// Responds with the stored record as a JSON file attachment.
pub async fn export_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let config = load(&state, &id).await?;
    let body = serde_json::to_string_pretty(&config)
        .map_err(|err| ApiError::InternalError(format!("failed to serialize config: {}", err)))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        deploy::export_filename(&config)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// `POST /api/agent/import`
///
/// Expects a multipart form with the exported JSON under the `file` field.
/// The imported record gets a fresh id and timestamps.
pub async fn import_agent(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreateAgentResponse>), ApiError> {
    let mut multipart =
        multipart.map_err(|_| ApiError::BadRequest("No file provided".to_string()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let selected = field.file_name().is_some_and(|name| !name.is_empty());
        if !selected {
            return Err(ApiError::BadRequest("No file selected".to_string()));
        }
        upload = Some(field.bytes().await?);
        break;
    }
    let bytes = upload.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    let draft: AgentDraft = serde_json::from_slice(&bytes)
        .map_err(|_| ApiError::BadRequest("Invalid JSON file".to_string()))?;
    let config = state.agent_config_store.import(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAgentResponse {
            agent_id: config.id,
            config,
            message: "Agent imported successfully".to_string(),
        }),
    ))
}

/// `POST /api/agent/{id}/deploy`
pub async fn deploy_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeployAgentResponse>, ApiError> {
    let config = load(&state, &id).await?;
    Ok(Json(DeployAgentResponse {
        deployment_code: deploy::generate_deployment_code(&config),
        filename: deploy::deployment_filename(&config),
        message: "Deployment code generated successfully".to_string(),
    }))
}

async fn load(state: &AppState, raw_id: &str) -> Result<AgentConfig, ApiError> {
    let id = parse_agent_id(raw_id)?;
    state
        .agent_config_store
        .get(id)
        .await
        .ok_or_else(agent_not_found)
}
