//! Rate limiting port.

use async_trait::async_trait;

use super::StoreError;

/// Rate limiter trait - per-action, per-client request caps.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check whether `client` may perform `action` and, if so, consume one unit.
    /// A rejected check consumes nothing.
    async fn check(&self, action: &str, client: &str) -> Result<RateLimitResult, RateLimitError>;

    /// Forget every recorded usage. Returns the number of records removed.
    async fn reset_all(&self) -> Result<usize, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("No ceiling configured for action {0:?}")]
    UnknownAction(String),

    #[error("Backend error: {0}")]
    Backend(#[from] StoreError),
}
