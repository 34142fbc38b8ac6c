//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod document_store;
mod kv_store;
mod rate_limit;

pub use auth::{AdminAuthenticator, AdminIdentity, AuthError};
pub use document_store::{
    DatabaseQuery, DocumentStore, DocumentStoreError, MAX_PAGE_SIZE, PageRef, QueryPage,
};
pub use kv_store::{KeyValueStore, StoreError};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
