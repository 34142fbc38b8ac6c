//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use postcard_infra::{BasicAuthConfig, NotionConfig, RateLimitConfig};

#[cfg(feature = "redis")]
use postcard_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `index.html`, assets and an optional `404.html`.
    pub static_dir: PathBuf,
    /// Notion database receiving submissions. Empty when unset.
    pub notion_database_id: String,
    /// Take the client address from `Forwarded` / `X-Forwarded-For`.
    pub trust_proxy_headers: bool,
    pub auth: BasicAuthConfig,
    pub notion: NotionConfig,
    pub rate_limits: RateLimitConfig,
    /// Redis store; `None` runs on the in-memory store.
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("public"),
            notion_database_id: String::new(),
            trust_proxy_headers: false,
            auth: BasicAuthConfig::default(),
            notion: NotionConfig::default(),
            rate_limits: RateLimitConfig::default(),
            #[cfg(feature = "redis")]
            redis: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            notion_database_id: env::var("NOTION_DATABASE_ID").unwrap_or_default(),
            trust_proxy_headers: env::var("TRUST_PROXY_HEADERS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            auth: BasicAuthConfig::from_env(),
            notion: NotionConfig::from_env(),
            rate_limits: RateLimitConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: env::var("REDIS_URL").ok().map(|_| RedisConfig::from_env()),
        }
    }
}
