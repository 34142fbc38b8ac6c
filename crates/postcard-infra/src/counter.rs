//! Store-backed counters (submissions, page visits).

use std::sync::Arc;

use postcard_core::domain::StoreKey;
use postcard_core::ports::{KeyValueStore, StoreError};

/// Read an integer counter. Absent keys count as zero.
pub(crate) async fn read_count(store: &dyn KeyValueStore, key: &StoreKey) -> Result<u64, StoreError> {
    match store.get(key).await? {
        None => Ok(0),
        Some(raw) => raw.trim().parse().map_err(|_| StoreError::Corrupt {
            key: key.encode(),
            reason: format!("expected a non-negative integer, found {:?}", raw),
        }),
    }
}

/// Monotonic counter persisted in the key-value store.
///
/// `increment` is a read followed by a write. Two concurrent increments can
/// both read the same value and one update is lost.
#[derive(Clone)]
pub struct StoreCounter {
    store: Arc<dyn KeyValueStore>,
}

impl StoreCounter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current value, zero when never written.
    pub async fn get(&self, key: &StoreKey) -> Result<u64, StoreError> {
        read_count(self.store.as_ref(), key).await
    }

    /// Add one and return the new value.
    pub async fn increment(&self, key: &StoreKey) -> Result<u64, StoreError> {
        let next = self.get(key).await? + 1;
        self.store.set(key, &next.to_string()).await?;
        tracing::debug!(key = %key, value = next, "Counter incremented");
        Ok(next)
    }

    /// Replace the stored value.
    pub async fn overwrite(&self, key: &StoreKey, value: u64) -> Result<(), StoreError> {
        self.store.set(key, &value.to_string()).await
    }
}
