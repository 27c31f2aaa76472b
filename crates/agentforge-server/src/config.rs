//! Server configuration read from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `AGENTFORGE_STORE_PATH` | `agent_configs/agents.json` |
//! | `AGENTFORGE_PORT` | `8081` |
//! | `AGENTFORGE_TEST_TIMEOUT_SECS` | `60` |
//! | `AGENTFORGE_MAX_CONCURRENT_RUNS` | `16` |
//! | `AGENTFORGE_LLM_PROVIDER` | unset |
//! | `AGENTFORGE_LLM_MODEL` | unset |
//! | `AGENTFORGE_LLM_API_BASE_URL` | unset |
//! | `AGENTFORGE_LLM_API_KEY` | unset |

use std::path::PathBuf;
use std::time::Duration;

use crate::llm_provider::LlmSettings;

pub const DEFAULT_STORE_PATH: &str = "agent_configs/agents.json";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_CONCURRENT_RUNS: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub store_path: PathBuf,
    pub port: u16,
    /// Wall-clock cap on synchronous agent runs (test and process endpoints).
    pub run_timeout: Duration,
    /// Upper bound on agent runs in flight across the whole process.
    pub max_concurrent_runs: usize,
    /// Provider defaults for agents that do not override them.
    pub llm: LlmSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            port: DEFAULT_PORT,
            run_timeout: DEFAULT_TEST_TIMEOUT,
            max_concurrent_runs: DEFAULT_MAX_CONCURRENT_RUNS,
            llm: LlmSettings::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ServerConfig::default();

        if let Some(path) = lookup("AGENTFORGE_STORE_PATH") {
            config.store_path = PathBuf::from(path);
        }
        if let Some(port) = lookup("AGENTFORGE_PORT") {
            config.port = parse(&port, "AGENTFORGE_PORT", "a port number")?;
        }
        if let Some(secs) = lookup("AGENTFORGE_TEST_TIMEOUT_SECS") {
            let secs: u64 = parse(&secs, "AGENTFORGE_TEST_TIMEOUT_SECS", "a positive integer")?;
            if secs == 0 {
                return Err(invalid("AGENTFORGE_TEST_TIMEOUT_SECS", "a positive integer", "0"));
            }
            config.run_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = lookup("AGENTFORGE_MAX_CONCURRENT_RUNS") {
            let limit: usize =
                parse(&limit, "AGENTFORGE_MAX_CONCURRENT_RUNS", "a positive integer")?;
            if limit == 0 {
                return Err(invalid("AGENTFORGE_MAX_CONCURRENT_RUNS", "a positive integer", "0"));
            }
            config.max_concurrent_runs = limit;
        }

        config.llm = LlmSettings {
            provider: lookup("AGENTFORGE_LLM_PROVIDER"),
            model: lookup("AGENTFORGE_LLM_MODEL"),
            api_base_url: lookup("AGENTFORGE_LLM_API_BASE_URL"),
            api_key: lookup("AGENTFORGE_LLM_API_KEY"),
        }
        .normalize();

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(
    raw: &str,
    var: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(var, expected, raw))
}

fn invalid(var: &'static str, expected: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.run_timeout, DEFAULT_TEST_TIMEOUT);
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert!(!config.llm.is_configured());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("AGENTFORGE_PORT", "9000"),
            ("AGENTFORGE_TEST_TIMEOUT_SECS", "5"),
            ("AGENTFORGE_MAX_CONCURRENT_RUNS", "2"),
            ("AGENTFORGE_LLM_PROVIDER", "openrouter"),
            ("AGENTFORGE_LLM_MODEL", "openai/gpt-4o-mini"),
            ("AGENTFORGE_LLM_API_KEY", "sk-test"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.run_timeout, Duration::from_secs(5));
        assert_eq!(config.max_concurrent_runs, 2);
        assert!(config.llm.is_configured());
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("AGENTFORGE_PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "AGENTFORGE_PORT must be a port number, got 'eighty'"
        );
        assert!(ServerConfig::from_lookup(lookup(&[("AGENTFORGE_MAX_CONCURRENT_RUNS", "0")])).is_err());
    }
}
