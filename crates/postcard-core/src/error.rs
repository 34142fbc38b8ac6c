//! Domain-level error types.

use thiserror::Error;

use crate::ports::{DocumentStoreError, StoreError};

/// Domain errors - failures raised while orchestrating a request.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Malformed submission: {0}")]
    MalformedSubmission(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Document store error: {0}")]
    DocumentStore(#[from] DocumentStoreError),
}
