use async_trait::async_trait;

use crate::domain::StoreKey;

/// Key-value store trait - abstraction over persistent backends (Redis, in-memory).
///
/// Values are opaque strings; callers own their encoding. None of the
/// operations are combined atomically: a read followed by a write may race
/// with another request doing the same.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a value. `Ok(None)` when the key is absent.
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError>;

    /// Set a value, overwriting any previous one.
    async fn set(&self, key: &StoreKey, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &StoreKey) -> Result<(), StoreError>;

    /// Every key under `prefix`, in encoded order.
    async fn list(&self, prefix: &StoreKey) -> Result<Vec<StoreKey>, StoreError>;
}

/// Key-value store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Corrupt value at {key}: {reason}")]
    Corrupt { key: String, reason: String },
}
