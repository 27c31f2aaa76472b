//! Deployment script generation and derived file names.
//!
//! [`generate_deployment_code`] renders a standalone launcher for the agent
//! runtime with the configuration baked in. It is a pure function of the
//! config: the same record always yields byte-identical output.

use crate::config::AgentConfig;
use crate::registry;

/// `<slug>_agent.py`
pub fn deployment_filename(config: &AgentConfig) -> String {
    format!("{}_agent.py", slug(&config.name))
}

/// `agent_<slug>_<first 8 id chars>.json`
pub fn export_filename(config: &AgentConfig) -> String {
    format!("agent_{}_{}.json", slug(&config.name), config.id.short())
}

/// Lowercased name with spaces replaced by underscores.
pub fn slug(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

/// Class identifier derived from the agent name: alphanumerics only, with an
/// `Agent` suffix.
pub fn class_name(name: &str) -> String {
    let mut ident: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "Custom");
    }
    ident.push_str("Agent");
    ident
}

pub fn generate_deployment_code(config: &AgentConfig) -> String {
    let class_names: Vec<&str> = config
        .tools
        .iter()
        .filter_map(|id| registry::tool(id))
        .map(|t| t.class_name)
        .collect();
    let imports = class_names
        .iter()
        .copied()
        .chain(std::iter::once("ToolCollection"))
        .collect::<Vec<_>>()
        .join(", ");
    let constructors = class_names
        .iter()
        .map(|c| format!("{}()", c))
        .collect::<Vec<_>>()
        .join(", ");
    let class = class_name(&config.name);

    format!(
        r#"#!/usr/bin/env python3
"""
Custom Agent: {title}
Generated by agentforge

Description: {doc_description}
Created: {created}
"""

import asyncio
from app.agent.toolcall import ToolCallAgent
from app.tool import {imports}


class {class}(ToolCallAgent):
    """
    {doc_description}
    """

    name: str = "{agent_name}"
    description: str = "{description}"
    system_prompt: str = """{system_prompt}"""

    max_steps: int = {max_steps}

    available_tools: ToolCollection = ToolCollection(
        {constructors}
    )

    special_tool_names: list[str] = ["terminate"]


async def main():
    agent = {class}()

    try:
        prompt = input("Enter your prompt: ")
        if not prompt.strip():
            print("Empty prompt provided.")
            return

        print("Processing your request...")
        result = await agent.run(prompt)
        print("\nResult:")
        print(result)

    except KeyboardInterrupt:
        print("\nOperation interrupted.")
    except Exception as e:
        print(f"Error: {{e}}")
    finally:
        await agent.cleanup()


if __name__ == "__main__":
    asyncio.run(main())
"#,
        title = escape_docstring(&config.name),
        doc_description = escape_docstring(&config.description),
        created = config.created_at.to_rfc3339(),
        imports = imports,
        class = class,
        agent_name = escape_string(&slug(&config.name)),
        description = escape_string(&config.description),
        system_prompt = escape_docstring(&config.system_prompt),
        max_steps = config.max_steps,
        constructors = constructors,
    )
}

/// Escapes for a double-quoted single-line literal.
fn escape_string(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Escapes for a triple-quoted literal; newlines are kept. Every quote is
/// escaped so none can merge with the closing delimiter.
fn escape_docstring(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
