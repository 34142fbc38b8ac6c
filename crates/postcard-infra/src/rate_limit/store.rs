//! Store-backed rate limiter with a cumulative per-client cap.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use postcard_core::domain::StoreKey;
use postcard_core::ports::{KeyValueStore, RateLimitError, RateLimitResult, RateLimiter};

use crate::counter::read_count;

/// Action rate-limited on the postcard submission endpoint.
pub const XMAS_POSTCARD_SUBMISSIONS: &str = "xmas_postcard_submissions";

/// Ceiling per action key.
///
/// The cap is cumulative: usage only goes back to zero through
/// [`RateLimiter::reset_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub ceilings: HashMap<String, u32>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            ceilings: HashMap::from([(XMAS_POSTCARD_SUBMISSIONS.to_string(), 5)]),
        }
    }
}

impl RateLimitConfig {
    pub fn with_ceiling(mut self, action: impl Into<String>, max_requests: u32) -> Self {
        self.ceilings.insert(action.into(), max_requests);
        self
    }

    pub fn ceiling(&self, action: &str) -> Option<u32> {
        self.ceilings.get(action).copied()
    }

    /// Load `RATE_LIMITS=action=max,other=max`, overriding the defaults.
    pub fn from_env() -> Self {
        match std::env::var("RATE_LIMITS") {
            Ok(list) => Self::default().merge_ceilings(&list),
            Err(_) => Self::default(),
        }
    }

    /// Merge a comma-separated `action=max` list. Bad entries are skipped.
    pub fn merge_ceilings(mut self, list: &str) -> Self {
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let parsed = entry
                .split_once('=')
                .and_then(|(action, max)| Some((action.trim(), max.trim().parse::<u32>().ok()?)));

            match parsed {
                Some((action, max)) if !action.is_empty() && max > 0 => {
                    self.ceilings.insert(action.to_string(), max);
                }
                _ => tracing::warn!(entry = %entry, "Ignoring invalid RATE_LIMITS entry"),
            }
        }
        self
    }
}

/// Rate limiter persisting usage under `rate_limit/<action>/<client>`.
///
/// The check and the increment are separate store calls, so two concurrent
/// requests from one client can both be admitted at the ceiling.
pub struct StoreRateLimiter {
    store: Arc<dyn KeyValueStore>,
    config: RateLimitConfig,
}

impl StoreRateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

#[async_trait]
impl RateLimiter for StoreRateLimiter {
    async fn check(&self, action: &str, client: &str) -> Result<RateLimitResult, RateLimitError> {
        let limit = self
            .config
            .ceiling(action)
            .ok_or_else(|| RateLimitError::UnknownAction(action.to_string()))?;

        let key = StoreKey::rate_limit(action, client);
        let usage = read_count(self.store.as_ref(), &key).await?;

        tracing::debug!(action = %action, client = %client, usage, limit, "Rate limit check");

        if usage >= u64::from(limit) {
            return Ok(RateLimitResult {
                allowed: false,
                limit,
                remaining: 0,
            });
        }

        let usage = usage + 1;
        self.store.set(&key, &usage.to_string()).await?;

        Ok(RateLimitResult {
            allowed: true,
            limit,
            remaining: u32::try_from(u64::from(limit) - usage).unwrap_or(0),
        })
    }

    async fn reset_all(&self) -> Result<usize, RateLimitError> {
        let keys = self.store.list(&StoreKey::rate_limit_prefix()).await?;
        for key in &keys {
            self.store.delete(key).await?;
        }

        tracing::info!(removed = keys.len(), "Rate limits reset");
        Ok(keys.len())
    }
}
