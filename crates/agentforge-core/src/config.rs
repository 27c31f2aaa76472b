//! Agent configuration records and the draft/patch type used to build them.
//!
//! [`AgentConfig`] is the persisted record. [`AgentDraft`] is the loosely
//! typed payload received from clients: every field is optional so the same
//! type serves create, partial update, and import. Validation happens when a
//! draft is turned into (or merged onto) a config, never on a half-built record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::id::AgentId;
use crate::registry;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
pub const DEFAULT_MAX_STEPS: u32 = 20;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// A stored agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: AgentId,
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    /// Tool identifiers, in the order the agent should receive them.
    pub tools: Vec<String>,
    pub max_steps: u32,
    pub temperature: f64,
    /// Opaque provider overrides (`provider`, `model`, `api_base_url`, `api_key`).
    #[serde(default)]
    pub llm_config: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the record entered the store through an import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<DateTime<Utc>>,
}

/// Listing view of a config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub name: String,
    pub description: String,
    pub tools: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AgentConfig> for AgentSummary {
    fn from(config: &AgentConfig) -> Self {
        AgentSummary {
            id: config.id,
            name: config.name.clone(),
            description: config.description.clone(),
            tools: config.tools.clone(),
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

/// Client-supplied config fields.
///
/// Unknown keys are ignored, so an exported config file deserializes into a
/// draft directly (its `id` and timestamps are dropped).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub system_prompt: Option<String>,
    pub tools: Option<Vec<String>>,
    /// Signed so that negative values produce a validation error rather than
    /// a deserialization failure.
    pub max_steps: Option<i64>,
    pub temperature: Option<f64>,
    pub llm_config: Option<Map<String, Value>>,
}

impl AgentDraft {
    /// Builds a new record. `name`, `description` and `tools` are required;
    /// everything else falls back to defaults.
    pub fn into_config(self, id: AgentId, now: DateTime<Utc>) -> Result<AgentConfig, CoreError> {
        let name = self.name.ok_or(CoreError::MissingField("name"))?;
        let description = self.description.ok_or(CoreError::MissingField("description"))?;
        let tools = self.tools.ok_or(CoreError::MissingField("tools"))?;

        let config = AgentConfig {
            id,
            name,
            description,
            system_prompt: self
                .system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            tools,
            max_steps: match self.max_steps {
                Some(steps) => checked_max_steps(steps)?,
                None => DEFAULT_MAX_STEPS,
            },
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            llm_config: self.llm_config.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            imported_at: None,
        };
        validate(&config)?;
        Ok(config)
    }

    /// Merges the provided fields over `existing`; absent fields keep their
    /// prior value. Returns a new record and leaves `existing` untouched, so a
    /// failed validation has no effect.
    pub fn merge_onto(
        self,
        existing: &AgentConfig,
        now: DateTime<Utc>,
    ) -> Result<AgentConfig, CoreError> {
        let mut merged = existing.clone();
        if let Some(name) = self.name {
            merged.name = name;
        }
        if let Some(description) = self.description {
            merged.description = description;
        }
        if let Some(system_prompt) = self.system_prompt {
            merged.system_prompt = system_prompt;
        }
        if let Some(tools) = self.tools {
            merged.tools = tools;
        }
        if let Some(steps) = self.max_steps {
            merged.max_steps = checked_max_steps(steps)?;
        }
        if let Some(temperature) = self.temperature {
            merged.temperature = temperature;
        }
        if let Some(llm_config) = self.llm_config {
            merged.llm_config = llm_config;
        }
        merged.updated_at = now;

        validate(&merged)?;
        Ok(merged)
    }
}

/// Checks the record-level invariants: known tools, positive step limit,
/// finite non-negative temperature.
pub fn validate(config: &AgentConfig) -> Result<(), CoreError> {
    if let Some(unknown) = config.tools.iter().find(|t| !registry::is_known_tool(t)) {
        return Err(CoreError::UnknownTool(unknown.clone()));
    }
    if config.max_steps == 0 {
        return Err(CoreError::InvalidField {
            field: "max_steps",
            reason: "must be a positive integer".to_string(),
        });
    }
    if !config.temperature.is_finite() || config.temperature < 0.0 {
        return Err(CoreError::InvalidField {
            field: "temperature",
            reason: format!("{} is not a non-negative number", config.temperature),
        });
    }
    Ok(())
}

fn checked_max_steps(steps: i64) -> Result<u32, CoreError> {
    u32::try_from(steps)
        .ok()
        .filter(|s| *s > 0)
        .ok_or_else(|| CoreError::InvalidField {
            field: "max_steps",
            reason: "must be a positive integer".to_string(),
        })
}
