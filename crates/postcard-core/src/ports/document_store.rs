//! Remote document store port.

use async_trait::async_trait;

use crate::domain::PageProperties;

/// Largest page the remote store hands back per query.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Remote database of pages (Notion).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a page in `database_id`.
    ///
    /// `Ok(None)` means the store is not configured and the call was skipped.
    async fn create_page(
        &self,
        database_id: &str,
        properties: &PageProperties,
    ) -> Result<Option<PageRef>, DocumentStoreError>;

    /// Fetch one page of query results.
    async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryPage, DocumentStoreError>;
}

/// Reference to a page held by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub id: String,
    pub url: Option<String>,
}

/// Parameters of a single query call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseQuery {
    pub start_cursor: Option<String>,
    pub page_size: u32,
}

impl Default for DatabaseQuery {
    fn default() -> Self {
        Self {
            start_cursor: None,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// One page of query results plus the cursor for the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPage {
    pub results: Vec<PageRef>,
    pub next_cursor: Option<String>,
}

/// Document store errors.
#[derive(Debug, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Remote rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}
