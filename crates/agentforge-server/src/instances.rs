//! Cache of built agents for stored configurations.
//!
//! The test endpoint reuses one agent per config id. Each entry remembers the
//! `updated_at` of the config it was built from, so an agent built from an
//! older revision is never handed out for a newer one. Updating or deleting
//! the config evicts the entry and cleans the evicted agent up in the
//! background; the next use builds a fresh one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use agentforge_core::{Agent, AgentConfig, AgentFactory, AgentId};

use crate::error::ApiError;

struct CachedAgent {
    revision: DateTime<Utc>,
    agent: Arc<dyn Agent>,
}

pub struct InstanceCache {
    instances: DashMap<AgentId, CachedAgent>,
}

impl InstanceCache {
    pub fn new() -> Self {
        InstanceCache {
            instances: DashMap::new(),
        }
    }

    /// Returns the cached agent for `config`, building it when there is none
    /// or the cached one predates `config.updated_at`.
    pub fn get_or_build(
        &self,
        config: &AgentConfig,
        factory: &dyn AgentFactory,
    ) -> Result<Arc<dyn Agent>, ApiError> {
        if let Some(existing) = self.instances.get(&config.id) {
            if existing.revision >= config.updated_at {
                return Ok(Arc::clone(&existing.agent));
            }
        }
        let fresh = CachedAgent {
            revision: config.updated_at,
            agent: factory.build_configured(config)?,
        };

        let mut stale = None;
        let agent = match self.instances.entry(config.id) {
            // A concurrent builder for the same or a newer revision won.
            Entry::Occupied(slot) if slot.get().revision >= config.updated_at => {
                Arc::clone(&slot.get().agent)
            }
            Entry::Occupied(mut slot) => {
                let agent = Arc::clone(&fresh.agent);
                stale = Some(slot.insert(fresh).agent);
                agent
            }
            Entry::Vacant(slot) => Arc::clone(&slot.insert(fresh).agent),
        };
        if let Some(stale) = stale {
            tracing::debug!(agent_id = %config.id, "replaced agent built from an older revision");
            tokio::spawn(async move {
                stale.cleanup().await;
            });
        }
        Ok(agent)
    }

    /// Drops the cached agent for `id`, if any, and runs its cleanup off the
    /// request path. Returns whether an entry was evicted.
    pub fn invalidate(&self, id: AgentId) -> bool {
        match self.instances.remove(&id) {
            Some((_, cached)) => {
                tokio::spawn(async move {
                    cached.agent.cleanup().await;
                });
                tracing::debug!(agent_id = %id, "cached agent evicted");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Evicts every entry and waits for all cleanups.
    pub async fn clear(&self) {
        let ids: Vec<AgentId> = self.instances.iter().map(|e| *e.key()).collect();
        for id in ids {
            if let Some((_, cached)) = self.instances.remove(&id) {
                cached.agent.cleanup().await;
            }
        }
    }
}

impl Default for InstanceCache {
    fn default() -> Self {
        Self::new()
    }
}
