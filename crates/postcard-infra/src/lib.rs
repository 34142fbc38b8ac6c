//! # Postcard Infrastructure
//!
//! Concrete implementations of the ports defined in `postcard-core`.
//! This crate contains the key-value stores, the store-backed rate limiter
//! and counters, the admin gate and the Notion client.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external store, in-memory only
//! - `redis` - Redis key-value store

pub mod auth;
pub mod counter;
pub mod kv;
pub mod notion;
pub mod rate_limit;

// Re-exports - In-Memory
pub use kv::InMemoryStore;
pub use notion::InMemoryDocumentStore;

pub use auth::{BasicAuthConfig, BasicAuthGate};
pub use counter::StoreCounter;
pub use notion::{NotionClient, NotionConfig};
pub use rate_limit::{RateLimitConfig, StoreRateLimiter};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use kv::{RedisConfig, RedisStore};
