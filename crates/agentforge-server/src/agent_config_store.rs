//! In-memory agent configuration store with write-through persistence.
//!
//! Every mutation builds the next snapshot, hands it to the
//! [`ConfigPersistence`] backend, and only then replaces the live map. A
//! failed save therefore leaves both the file and memory at the previous
//! state.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;

use agentforge_core::{
    AgentConfig, AgentDraft, AgentId, AgentSummary, ConfigPersistence, InMemoryBackend,
};

use crate::error::ApiError;

pub struct AgentConfigStore {
    configs: Mutex<HashMap<AgentId, AgentConfig>>,
    backend: Box<dyn ConfigPersistence>,
}

impl AgentConfigStore {
    /// Opens a store over `backend`, loading whatever it holds.
    pub fn new(backend: Box<dyn ConfigPersistence>) -> Result<Self, ApiError> {
        let configs = backend.load()?;
        tracing::info!(count = configs.len(), "loaded agent configs");
        Ok(AgentConfigStore {
            configs: Mutex::new(configs),
            backend,
        })
    }

    pub fn in_memory() -> Result<Self, ApiError> {
        Self::new(Box::new(InMemoryBackend::new()))
    }

    pub async fn create(&self, draft: AgentDraft) -> Result<AgentConfig, ApiError> {
        let config = draft.into_config(AgentId::new(), Utc::now())?;
        self.commit(|next| {
            next.insert(config.id, config.clone());
        })
        .await?;
        tracing::info!(agent_id = %config.id, name = %config.name, "agent config created");
        Ok(config)
    }

    /// Stores a config from an import payload under a fresh id. The import
    /// time becomes the creation time.
    pub async fn import(&self, draft: AgentDraft) -> Result<AgentConfig, ApiError> {
        let now = Utc::now();
        let mut config = draft.into_config(AgentId::new(), now)?;
        config.imported_at = Some(now);
        self.commit(|next| {
            next.insert(config.id, config.clone());
        })
        .await?;
        tracing::info!(agent_id = %config.id, name = %config.name, "agent config imported");
        Ok(config)
    }

    pub async fn get(&self, id: AgentId) -> Option<AgentConfig> {
        self.configs.lock().await.get(&id).cloned()
    }

    pub async fn update(&self, id: AgentId, patch: AgentDraft) -> Result<AgentConfig, ApiError> {
        let mut guard = self.configs.lock().await;
        let existing = guard.get(&id).ok_or_else(agent_not_found)?;
        let merged = patch.merge_onto(existing, Utc::now())?;

        let mut next = guard.clone();
        next.insert(id, merged.clone());
        self.backend.save(&next)?;
        *guard = next;

        tracing::info!(agent_id = %id, "agent config updated");
        Ok(merged)
    }

    pub async fn delete(&self, id: AgentId) -> Result<AgentConfig, ApiError> {
        let mut guard = self.configs.lock().await;
        let mut next = guard.clone();
        let removed = next.remove(&id).ok_or_else(agent_not_found)?;
        self.backend.save(&next)?;
        *guard = next;

        tracing::info!(agent_id = %id, "agent config deleted");
        Ok(removed)
    }

    /// Summaries ordered by creation time, then id.
    pub async fn list(&self) -> Vec<AgentSummary> {
        let guard = self.configs.lock().await;
        let mut configs: Vec<&AgentConfig> = guard.values().collect();
        configs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        configs.into_iter().map(AgentSummary::from).collect()
    }

    pub async fn len(&self) -> usize {
        self.configs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn commit(
        &self,
        mutate: impl FnOnce(&mut HashMap<AgentId, AgentConfig>),
    ) -> Result<(), ApiError> {
        let mut guard = self.configs.lock().await;
        let mut next = guard.clone();
        mutate(&mut next);
        self.backend.save(&next)?;
        *guard = next;
        Ok(())
    }
}

pub fn agent_not_found() -> ApiError {
    ApiError::NotFound("Agent not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentforge_core::StoreError;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn draft(value: serde_json::Value) -> AgentDraft {
        serde_json::from_value(value).unwrap()
    }

    fn basic() -> AgentDraft {
        draft(json!({"name": "T", "description": "d", "tools": ["terminate"]}))
    }

    /// Backend whose saves can be switched to fail. Clones share state.
    #[derive(Clone, Default)]
    struct Flaky {
        inner: Arc<InMemoryBackend>,
        failing: Arc<AtomicBool>,
    }

    impl ConfigPersistence for Flaky {
        fn load(&self) -> Result<HashMap<AgentId, AgentConfig>, StoreError> {
            self.inner.load()
        }

        fn save(&self, configs: &HashMap<AgentId, AgentConfig>) -> Result<(), StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Io {
                    path: "flaky.json".into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.save(configs)
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_never_stored() {
        let store = AgentConfigStore::in_memory().unwrap();
        let err = store
            .create(draft(json!({"name": "T", "description": "d", "tools": ["nope"]})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_then_get_is_absent() {
        let store = AgentConfigStore::in_memory().unwrap();
        let created = store.create(basic()).await.unwrap();
        store.delete(created.id).await.unwrap();
        assert!(store.get(created.id).await.is_none());
        assert!(matches!(
            store.delete(created.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn failed_update_changes_nothing() {
        let store = AgentConfigStore::in_memory().unwrap();
        let created = store.create(basic()).await.unwrap();
        let err = store
            .update(created.id, draft(json!({"name": "renamed", "tools": ["bogus"]})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: bogus");
        assert_eq!(store.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn failed_save_rolls_back() {
        let backend = Flaky::default();
        let store = AgentConfigStore::new(Box::new(backend.clone())).unwrap();
        let kept = store.create(basic()).await.unwrap();

        backend.failing.store(true, Ordering::SeqCst);
        assert!(store.create(basic()).await.is_err());
        assert!(store.delete(kept.id).await.is_err());
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(kept.id).await, Some(kept));
    }

    #[tokio::test]
    async fn reopening_reloads_persisted_records() {
        let backend = Flaky::default();
        let store = AgentConfigStore::new(Box::new(backend.clone())).unwrap();
        let created = store.create(basic()).await.unwrap();

        let reopened = AgentConfigStore::new(Box::new(backend)).unwrap();
        assert_eq!(reopened.get(created.id).await, Some(created));
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let store = AgentConfigStore::in_memory().unwrap();
        let first = store.create(basic()).await.unwrap();
        let second = store.create(basic()).await.unwrap();
        let ids: Vec<AgentId> = store.list().await.into_iter().map(|s| s.id).collect();
        if first.created_at == second.created_at {
            let mut expected = vec![first.id, second.id];
            expected.sort();
            assert_eq!(ids, expected);
        } else {
            assert_eq!(ids, vec![first.id, second.id]);
        }
    }

    #[tokio::test]
    async fn import_stamps_fresh_identity() {
        let store = AgentConfigStore::in_memory().unwrap();
        let original = store.create(basic()).await.unwrap();
        let exported: AgentDraft =
            serde_json::from_value(serde_json::to_value(&original).unwrap()).unwrap();

        let imported = store.import(exported).await.unwrap();
        assert_ne!(imported.id, original.id);
        assert!(imported.imported_at.is_some());
        assert_eq!(imported.name, original.name);
        assert_eq!(store.len().await, 2);
    }
}
