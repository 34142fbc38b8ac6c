//! Application state - shared across all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use postcard_core::DomainError;
use postcard_core::ports::{
    AdminAuthenticator, DocumentStore, KeyValueStore, RateLimiter, StoreError,
};
use postcard_infra::{BasicAuthGate, InMemoryStore, NotionClient, StoreCounter, StoreRateLimiter};

#[cfg(feature = "redis")]
use postcard_infra::RedisStore;

use crate::config::AppConfig;
use crate::middleware::client_ip::ClientIpPolicy;
use crate::services::{StatsService, SubmissionService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub admin: Arc<dyn AdminAuthenticator>,
    pub counter: StoreCounter,
    pub submissions: SubmissionService,
    pub stats: StatsService,
    pub client_ip: ClientIpPolicy,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Build the application state with the configured backends.
    pub async fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let store = connect_store(config).await?;
        let documents: Arc<dyn DocumentStore> = Arc::new(NotionClient::new(config.notion.clone())?);
        let admin: Arc<dyn AdminAuthenticator> = Arc::new(BasicAuthGate::new(config.auth.clone()));

        if config.notion_database_id.is_empty() {
            tracing::warn!("NOTION_DATABASE_ID not set. Submissions will not be stored in Notion.");
        }

        let state = Self::assemble(config, store, documents, admin);
        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Wire services over already-built adapters.
    pub fn assemble(
        config: &AppConfig,
        store: Arc<dyn KeyValueStore>,
        documents: Arc<dyn DocumentStore>,
        admin: Arc<dyn AdminAuthenticator>,
    ) -> Self {
        let counter = StoreCounter::new(store.clone());
        let rate_limiter: Arc<dyn RateLimiter> = Arc::new(StoreRateLimiter::new(
            store,
            config.rate_limits.clone(),
        ));

        Self {
            submissions: SubmissionService::new(
                documents.clone(),
                counter.clone(),
                config.notion_database_id.clone(),
            ),
            stats: StatsService::new(documents, counter.clone(), config.notion_database_id.clone()),
            rate_limiter,
            admin,
            counter,
            client_ip: ClientIpPolicy::new(config.trust_proxy_headers),
            static_dir: config.static_dir.clone(),
        }
    }
}

#[cfg(feature = "redis")]
async fn connect_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    let Some(redis) = &config.redis else {
        tracing::warn!("REDIS_URL not set. Running with in-memory store; data is lost on restart.");
        return Ok(Arc::new(InMemoryStore::new()));
    };

    match RedisStore::new(redis.clone()).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) if redis.fallback_to_memory => {
            tracing::error!(
                "Failed to connect to Redis: {}. Using in-memory fallback.",
                e
            );
            Ok(Arc::new(InMemoryStore::new()))
        }
        Err(e) => Err(e),
    }
}

#[cfg(not(feature = "redis"))]
async fn connect_store(_config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    tracing::info!("Running without redis feature - using in-memory store");
    Ok(Arc::new(InMemoryStore::new()))
}
