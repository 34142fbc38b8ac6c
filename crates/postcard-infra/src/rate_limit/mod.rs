//! Rate limiting implementations.

mod store;

pub use store::{RateLimitConfig, StoreRateLimiter, XMAS_POSTCARD_SUBMISSIONS};
