//! In-memory key-value store - used as fallback when Redis is unavailable.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use postcard_core::domain::StoreKey;
use postcard_core::ports::{KeyValueStore, StoreError};

/// In-memory store using an ordered map behind an async RwLock.
///
/// Keys are held in encoded form so prefix scans are a range walk.
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    store: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        let store = self.store.read().await;
        Ok(store.get(&key.encode()).cloned())
    }

    async fn set(&self, key: &StoreKey, value: &str) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        store.insert(key.encode(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        store.remove(&key.encode());
        Ok(())
    }

    async fn list(&self, prefix: &StoreKey) -> Result<Vec<StoreKey>, StoreError> {
        let pattern = prefix.encode_prefix();
        let store = self.store.read().await;

        store
            .range(pattern.clone()..)
            .take_while(|(k, _)| k.starts_with(&pattern))
            .map(|(k, _)| {
                StoreKey::decode(k).map_err(|e| StoreError::Corrupt {
                    key: k.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
