//! Tool seam between agents and their plugins.
//!
//! Real tool implementations belong to the agent runtime. This module defines
//! the [`Tool`] contract, a [`ToolCollection`] an agent is built with, and the
//! two tools that ship with the server itself: a browser automation mock and
//! `terminate`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::CoreError;
use crate::registry::{self, ToolDescriptor};

/// Outcome of a tool call: exactly one of `output` or `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn output(text: impl Into<String>) -> Self {
        ToolResult {
            output: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        ToolResult {
            output: None,
            error: Some(text.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema of the accepted arguments.
    fn parameters(&self) -> Value;
    async fn execute(&self, args: Value) -> ToolResult;
    async fn cleanup(&self) {}
}

/// Tools an agent has been configured with, in configuration order.
#[derive(Clone, Default)]
pub struct ToolCollection {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolCollection {
    /// Resolves registry ids. Ids with a local implementation get it; the rest
    /// are represented by their descriptor and report that the runtime must
    /// supply them.
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Result<Self, CoreError> {
        let tools = ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                let descriptor =
                    registry::tool(id).ok_or_else(|| CoreError::UnknownTool(id.to_string()))?;
                Ok(builtin(descriptor))
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(ToolCollection { tools })
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub async fn execute(&self, name: &str, args: Value) -> ToolResult {
        match self.get(name) {
            Some(tool) => tool.execute(args).await,
            None => ToolResult::error(format!("Tool {} is invalid", name)),
        }
    }

    /// One `- name: description` line per tool, for prompt assembly.
    pub fn summary(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub async fn cleanup(&self) {
        for tool in &self.tools {
            tool.cleanup().await;
        }
    }
}

fn builtin(descriptor: &'static ToolDescriptor) -> Arc<dyn Tool> {
    match descriptor.id {
        "browser_use" => Arc::new(BrowserUseMock),
        "terminate" => Arc::new(Terminate),
        _ => Arc::new(RuntimeTool { descriptor }),
    }
}

/// Placeholder for a tool whose implementation lives in the agent runtime.
struct RuntimeTool {
    descriptor: &'static ToolDescriptor,
}

#[async_trait]
impl Tool for RuntimeTool {
    fn name(&self) -> &str {
        self.descriptor.id
    }

    fn description(&self) -> &str {
        self.descriptor.description
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object" })
    }

    async fn execute(&self, _args: Value) -> ToolResult {
        ToolResult::error(format!(
            "{} is provided by the agent runtime and is not available here",
            self.descriptor.id
        ))
    }
}

/// Browser automation stand-in. Describes what it would do instead of
/// driving a browser.
pub struct BrowserUseMock;

#[async_trait]
impl Tool for BrowserUseMock {
    fn name(&self) -> &str {
        "browser_use"
    }

    fn description(&self) -> &str {
        "Mock browser automation tool"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["go_to_url", "click_element", "input_text", "scroll_down", "scroll_up"],
                    "description": "The browser action to perform"
                },
                "url": {"type": "string", "description": "URL for go_to_url action"},
                "text": {"type": "string", "description": "Text for input_text action"}
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let arg = |key: &str| args.get(key).and_then(Value::as_str).unwrap_or_default();
        match arg("action") {
            "go_to_url" => ToolResult::output(format!(
                "Mock: Would navigate to {}\nNote: browser automation is not available in this runtime.",
                arg("url")
            )),
            "click_element" => ToolResult::output("Mock: Would click element"),
            "input_text" => ToolResult::output(format!("Mock: Would input text: {}", arg("text"))),
            action @ ("scroll_down" | "scroll_up") => {
                ToolResult::output(format!("Mock: Would {}", action))
            }
            other => ToolResult::error(format!("Unknown action: {}", other)),
        }
    }
}

/// Signals the end of an interaction.
pub struct Terminate;

#[async_trait]
impl Tool for Terminate {
    fn name(&self) -> &str {
        "terminate"
    }

    fn description(&self) -> &str {
        "Terminate the interaction when the request is met or cannot proceed further"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "enum": ["success", "failure"],
                    "description": "The finish status of the interaction"
                }
            },
            "required": ["status"]
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let status = args.get("status").and_then(Value::as_str).unwrap_or("success");
        ToolResult::output(format!(
            "The interaction has been completed with status: {}",
            status
        ))
    }
}
