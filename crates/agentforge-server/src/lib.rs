//! HTTP server for building, testing and chatting with AI agents.
//!
//! Stores agent configurations in a JSON file, runs agents built by an
//! [`AgentFactory`](agentforge_core::AgentFactory) under a bounded runner,
//! and hosts chat sessions whose replies are collected in a mailbox.

pub mod agent_config_store;
pub mod agent_runner;
pub mod config;
pub mod error;
pub mod handlers;
pub mod instances;
pub mod llm_agent;
pub mod llm_provider;
pub mod router;
pub mod schema;
pub mod sessions;
pub mod state;
