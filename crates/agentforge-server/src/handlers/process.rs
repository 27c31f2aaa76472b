//! One-shot prompt processing with a fresh general-purpose agent.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use agentforge_core::AgentType;

use super::optional_json;
use crate::error::ApiError;
use crate::schema::process::{ProcessRequest, ProcessResponse};
use crate::state::AppState;

const EMPTY_RESULT: &str = "Task completed successfully.";

/// `POST /process`
///
/// Builds a `manus` agent, runs the prompt under the shared runner's timeout
/// and discards the agent afterwards.
pub async fn process(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProcessResponse>, ApiError> {
    let req: ProcessRequest = optional_json(&body)?;
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("Empty prompt provided".to_string()));
    }

    let agent = state.factory.build_session(AgentType::Manus).await?;
    let outcome = state
        .runner
        .run_with_timeout(agent.clone(), prompt.to_string())
        .await;
    tokio::spawn(async move { agent.cleanup().await });

    let text = outcome?;
    let response = if text.trim().is_empty() {
        EMPTY_RESULT.to_string()
    } else {
        text
    };
    Ok(Json(ProcessResponse { response }))
}
