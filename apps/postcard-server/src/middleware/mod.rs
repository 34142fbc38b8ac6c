//! Middleware, extractors and route guards.

pub mod admin;
pub mod client_ip;
pub mod error;
pub mod rate_limit;
