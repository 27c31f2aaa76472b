//! Whole-snapshot persistence for agent configurations.
//!
//! Every mutation rewrites the full set of records; there is no incremental
//! write path. [`JsonFileBackend`] keeps the snapshot in a single JSON object
//! keyed by agent id. [`InMemoryBackend`] keeps it in process, for tests and
//! throwaway servers.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::config::AgentConfig;
use crate::id::AgentId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config file {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize agent configs: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("config store lock poisoned")]
    Poisoned,
}

/// Storage contract for the agent config snapshot.
pub trait ConfigPersistence: Send + Sync {
    /// Reads the last saved snapshot. A backend with nothing saved yet
    /// returns an empty map.
    fn load(&self) -> Result<HashMap<AgentId, AgentConfig>, StoreError>;

    /// Replaces the saved snapshot.
    fn save(&self, configs: &HashMap<AgentId, AgentConfig>) -> Result<(), StoreError>;
}

/// Snapshot stored as pretty-printed JSON at a fixed path.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ConfigPersistence for JsonFileBackend {
    fn load(&self) -> Result<HashMap<AgentId, AgentConfig>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => return Err(self.io_err(err)),
        };
        let by_key: BTreeMap<String, AgentConfig> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        // The record's own id is authoritative; the object key is for readers.
        Ok(by_key.into_values().map(|c| (c.id, c)).collect())
    }

    fn save(&self, configs: &HashMap<AgentId, AgentConfig>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let by_key: BTreeMap<String, &AgentConfig> =
            configs.iter().map(|(id, c)| (id.to_string(), c)).collect();
        let body = serde_json::to_string_pretty(&by_key)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, body).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        Ok(())
    }
}

/// Snapshot held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    snapshot: Mutex<HashMap<AgentId, AgentConfig>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigPersistence for InMemoryBackend {
    fn load(&self) -> Result<HashMap<AgentId, AgentConfig>, StoreError> {
        Ok(self.snapshot.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn save(&self, configs: &HashMap<AgentId, AgentConfig>) -> Result<(), StoreError> {
        *self.snapshot.lock().map_err(|_| StoreError::Poisoned)? = configs.clone();
        Ok(())
    }
}
