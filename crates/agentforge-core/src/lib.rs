//! Domain model for agentforge.
//!
//! Agent configuration records and their validation, the static tool and
//! template registries, the [`Agent`]/[`Tool`] runtime seam, snapshot
//! persistence, and deployment code generation. No HTTP or runtime concerns
//! live here.

pub mod agent;
pub mod config;
pub mod deploy;
pub mod error;
pub mod id;
pub mod registry;
pub mod store;
pub mod tool;

// Re-export commonly used types
pub use agent::{Agent, AgentFactory, AgentType};
pub use config::{AgentConfig, AgentDraft, AgentSummary};
pub use error::{AgentError, CoreError};
pub use id::{AgentId, SessionId};
pub use store::{ConfigPersistence, InMemoryBackend, JsonFileBackend, StoreError};
pub use tool::{Tool, ToolCollection, ToolResult};
