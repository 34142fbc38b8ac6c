//! Redis key-value store with connection manager and optional fallback.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use postcard_core::domain::StoreKey;
use postcard_core::ports::{KeyValueStore, StoreError};

/// Keys fetched per SCAN round trip.
const SCAN_BATCH: usize = 100;

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whether to fallback to the in-memory store if Redis is unavailable
    pub fallback_to_memory: bool,
    /// Prepended to every key so several apps can share one Redis
    pub namespace: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            fallback_to_memory: true,
            namespace: "postcard:".to_string(),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            fallback_to_memory: std::env::var("REDIS_FALLBACK_TO_MEMORY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            namespace: std::env::var("REDIS_KEY_NAMESPACE")
                .unwrap_or_else(|_| "postcard:".to_string()),
        }
    }
}

/// Redis-backed key-value store.
///
/// Uses connection manager for automatic reconnection.
pub struct RedisStore {
    conn: ConnectionManager,
    config: RedisConfig,
}

impl RedisStore {
    pub async fn new(config: RedisConfig) -> Result<Self, StoreError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| StoreError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| StoreError::Connection("Connection timed out".to_string()))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis store");

        Ok(Self { conn, config })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, StoreError> {
        Self::new(RedisConfig::from_env()).await
    }

    fn make_key(&self, key: &StoreKey) -> String {
        format!("{}{}", self.config.namespace, key.encode())
    }
}

/// Escape glob metacharacters so a literal prefix can be used with MATCH.
fn escape_glob(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(self.make_key(key))
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }

    async fn set(&self, key: &StoreKey, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.make_key(key), value)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }

    async fn delete(&self, key: &StoreKey) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.make_key(key))
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))
    }

    async fn list(&self, prefix: &StoreKey) -> Result<Vec<StoreKey>, StoreError> {
        let mut conn = self.conn.clone();
        let literal = format!("{}{}", self.config.namespace, prefix.encode_prefix());
        let pattern = format!("{}*", escape_glob(&literal));

        let mut raw_keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| StoreError::Operation(e.to_string()))?;
            raw_keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once
        raw_keys.sort();
        raw_keys.dedup();

        raw_keys
            .into_iter()
            .map(|raw| {
                let encoded = raw
                    .strip_prefix(&self.config.namespace)
                    .unwrap_or(raw.as_str());
                StoreKey::decode(encoded).map_err(|e| StoreError::Corrupt {
                    key: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
