//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for one API area.
//! Stored records (`AgentConfig`, `AgentSummary`) come from `agentforge-core`
//! and are embedded as-is.

pub mod agents;
pub mod catalog;
pub mod health;
pub mod process;
pub mod sessions;
