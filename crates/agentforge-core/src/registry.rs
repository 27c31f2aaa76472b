//! Static tool and template tables.
//!
//! These are read-only at runtime. Tool ids are the vocabulary that
//! [`AgentConfig::tools`](crate::config::AgentConfig) is validated against.

use serde::Serialize;

/// A selectable tool plugin.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
    /// Constructor name in the agent runtime, used by generated deployment code.
    #[serde(skip)]
    pub class_name: &'static str,
}

/// A preset agent configuration offered to the builder UI.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tools: &'static [&'static str],
    pub system_prompt: &'static str,
    pub max_steps: u32,
    pub temperature: f64,
}

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        id: "python_execute",
        name: "Python Execute",
        description: "Execute Python code safely with timeout and safety restrictions",
        category: "development",
        icon: "🐍",
        class_name: "PythonExecute",
    },
    ToolDescriptor {
        id: "bash",
        name: "Bash Terminal",
        description: "Execute bash commands in the terminal",
        category: "system",
        icon: "💻",
        class_name: "Bash",
    },
    ToolDescriptor {
        id: "str_replace_editor",
        name: "File Editor",
        description: "Create, view, and edit files with advanced text manipulation",
        category: "development",
        icon: "📝",
        class_name: "StrReplaceEditor",
    },
    ToolDescriptor {
        id: "browser_use",
        name: "Browser Automation",
        description: "Automate web browsing and interaction with websites",
        category: "web",
        icon: "🌐",
        class_name: "BrowserUseTool",
    },
    ToolDescriptor {
        id: "web_search",
        name: "Web Search",
        description: "Search the web for real-time information",
        category: "web",
        icon: "🔍",
        class_name: "WebSearch",
    },
    ToolDescriptor {
        id: "planning",
        name: "Planning Tool",
        description: "Create and manage plans for complex tasks",
        category: "productivity",
        icon: "📋",
        class_name: "PlanningTool",
    },
    ToolDescriptor {
        id: "create_chat_completion",
        name: "Chat Completion",
        description: "Create structured completions with specified output formatting",
        category: "ai",
        icon: "💬",
        class_name: "CreateChatCompletion",
    },
    ToolDescriptor {
        id: "terminate",
        name: "Terminate",
        description: "Terminate the interaction when tasks are complete",
        category: "control",
        icon: "🛑",
        class_name: "Terminate",
    },
];

pub const TEMPLATES: &[TemplateDescriptor] = &[
    TemplateDescriptor {
        id: "general",
        name: "General Purpose Agent",
        description: "A versatile agent for various tasks",
        tools: &["python_execute", "str_replace_editor", "web_search", "terminate"],
        system_prompt: "You are a helpful AI assistant that can execute code, edit files, search the web, and help with various tasks.",
        max_steps: 20,
        temperature: 0.7,
    },
    TemplateDescriptor {
        id: "developer",
        name: "Software Developer Agent",
        description: "Specialized for software development tasks",
        tools: &["python_execute", "bash", "str_replace_editor", "web_search", "terminate"],
        system_prompt: "You are an expert software developer. You can write, debug, and test code, manage files, and research programming solutions.",
        max_steps: 30,
        temperature: 0.3,
    },
    TemplateDescriptor {
        id: "researcher",
        name: "Research Agent",
        description: "Focused on research and information gathering",
        tools: &["web_search", "str_replace_editor", "python_execute", "terminate"],
        system_prompt: "You are a research specialist. You excel at finding information, analyzing data, and creating comprehensive reports.",
        max_steps: 25,
        temperature: 0.5,
    },
    TemplateDescriptor {
        id: "automation",
        name: "Automation Agent",
        description: "Designed for web automation and browser tasks",
        tools: &["browser_use", "web_search", "str_replace_editor", "terminate"],
        system_prompt: "You are an automation expert. You can control web browsers, interact with websites, and automate online tasks.",
        max_steps: 20,
        temperature: 0.4,
    },
    TemplateDescriptor {
        id: "planner",
        name: "Planning Agent",
        description: "Specialized in task planning and project management",
        tools: &["planning", "str_replace_editor", "web_search", "terminate"],
        system_prompt: "You are a project planning expert. You excel at breaking down complex tasks, creating detailed plans, and managing project workflows.",
        max_steps: 15,
        temperature: 0.6,
    },
];

pub fn tool(id: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.id == id)
}

pub fn is_known_tool(id: &str) -> bool {
    tool(id).is_some()
}
