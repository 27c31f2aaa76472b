//! Shared OpenAI-compatible provider chat client.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use agentforge_core::AgentError;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Provider connection settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmSettings {
    /// `openrouter`, `openai` or `openai_compatible`.
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
}

impl LlmSettings {
    /// Trims every field and drops blank ones.
    pub fn normalize(self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        LlmSettings {
            provider: clean(self.provider),
            model: clean(self.model),
            api_base_url: clean(self.api_base_url),
            api_key: clean(self.api_key),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some() && self.model.is_some() && self.api_key.is_some()
    }

    /// Applies per-agent overrides from an `llm_config` object. Only string
    /// values under the known keys are considered.
    pub fn overridden_by(&self, overrides: &Map<String, Value>) -> Self {
        let pick = |key: &str, current: &Option<String>| {
            overrides
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| current.clone())
        };
        LlmSettings {
            provider: pick("provider", &self.provider),
            model: pick("model", &self.model),
            api_base_url: pick("api_base_url", &self.api_base_url),
            api_key: pick("api_key", &self.api_key),
        }
        .normalize()
    }

    fn base_url(&self) -> Result<String, AgentError> {
        match self.provider.as_deref().unwrap_or_default() {
            "openrouter" => Ok(self
                .api_base_url
                .clone()
                .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string())),
            "openai" => Ok(self
                .api_base_url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string())),
            "openai_compatible" => self.api_base_url.clone().ok_or_else(|| {
                AgentError::NotConfigured(
                    "openai_compatible provider requires api_base_url".to_string(),
                )
            }),
            "" => Err(AgentError::NotConfigured("no provider set".to_string())),
            other => Err(AgentError::NotConfigured(format!(
                "unsupported provider '{}': use openrouter, openai or openai_compatible",
                other
            ))),
        }
    }
}

/// One chat exchange to send.
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub system_prompt: Option<&'a str>,
    pub user_message: &'a str,
    pub temperature: Option<f64>,
}

pub async fn run_external_chat(
    client: &reqwest::Client,
    llm: &LlmSettings,
    request: ChatRequest<'_>,
) -> Result<String, AgentError> {
    if !llm.is_configured() {
        return Err(AgentError::NotConfigured(
            "provider, model and api_key are required".to_string(),
        ));
    }
    let base_url = llm.base_url()?;
    let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    let api_key = llm.api_key.clone().unwrap_or_default();
    let model = llm.model.clone().unwrap_or_default();

    let mut messages = Vec::new();
    if let Some(system_prompt) = request.system_prompt {
        messages.push(json!({
            "role": "system",
            "content": system_prompt
        }));
    }
    messages.push(json!({
        "role": "user",
        "content": request.user_message
    }));

    let mut body = json!({
        "model": model,
        "messages": messages
    });
    if let Some(temperature) = request.temperature {
        body["temperature"] = json!(temperature);
    }

    let mut req = client
        .post(endpoint)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body);

    if llm.provider.as_deref() == Some("openrouter") {
        req = req
            .header("HTTP-Referer", "https://localhost:8081")
            .header("X-Title", "agentforge");
    }

    tracing::debug!(model = %model, "sending chat completion request");
    let response = req
        .send()
        .await
        .map_err(|err| AgentError::Provider(format!("request failed: {}", err)))?;

    let status = response.status();
    let body_text = response
        .text()
        .await
        .map_err(|err| AgentError::Provider(format!("response read failed: {}", err)))?;

    if !status.is_success() {
        return Err(AgentError::Provider(format!(
            "request failed ({}): {}",
            status, body_text
        )));
    }

    parse_assistant_content(&body_text)
}

fn parse_assistant_content(body_text: &str) -> Result<String, AgentError> {
    let parsed: OpenAiCompatibleChatResponse = serde_json::from_str(body_text)
        .map_err(|err| AgentError::Provider(format!("response parse failed: {}", err)))?;

    parsed
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AgentError::Provider("response missing assistant content".to_string()))
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleChatResponse {
    choices: Vec<OpenAiCompatibleChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleChoice {
    message: OpenAiCompatibleMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompatibleMessage {
    content: Option<String>,
}
