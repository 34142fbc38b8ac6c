//! In-memory document store - stands in for Notion in tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use postcard_core::domain::PageProperties;
use postcard_core::ports::{
    DatabaseQuery, DocumentStore, DocumentStoreError, MAX_PAGE_SIZE, PageRef, QueryPage,
};

/// Pages kept per database in creation order.
///
/// Cursors are the stringified offset of the next page. Call
/// [`InMemoryDocumentStore::set_failing`] to make every call fail like an
/// unreachable remote.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    databases: RwLock<HashMap<String, Vec<(PageRef, PageProperties)>>>,
    failing: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Insert `count` empty pages, as if created by someone else.
    pub async fn seed(&self, database_id: &str, count: usize) {
        let mut databases = self.databases.write().await;
        let pages = databases.entry(database_id.to_string()).or_default();
        for _ in 0..count {
            let id = format!("page-{}", pages.len() + 1);
            pages.push((PageRef { id, url: None }, PageProperties::new()));
        }
    }

    /// Properties of every page in `database_id`.
    pub async fn pages(&self, database_id: &str) -> Vec<PageProperties> {
        self.databases
            .read()
            .await
            .get(database_id)
            .map(|pages| pages.iter().map(|(_, props)| props.clone()).collect())
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), DocumentStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::Rejected {
                status: 503,
                message: "document store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_page(
        &self,
        database_id: &str,
        properties: &PageProperties,
    ) -> Result<Option<PageRef>, DocumentStoreError> {
        self.check_available()?;

        let mut databases = self.databases.write().await;
        let pages = databases.entry(database_id.to_string()).or_default();
        let page = PageRef {
            id: format!("page-{}", pages.len() + 1),
            url: None,
        };
        pages.push((page.clone(), properties.clone()));
        Ok(Some(page))
    }

    async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryPage, DocumentStoreError> {
        self.check_available()?;

        let start = match &query.start_cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| DocumentStoreError::Rejected {
                    status: 400,
                    message: format!("invalid start_cursor {:?}", cursor),
                })?,
            None => 0,
        };
        let size = query.page_size.clamp(1, MAX_PAGE_SIZE) as usize;

        let databases = self.databases.read().await;
        let pages = databases.get(database_id).map(Vec::as_slice).unwrap_or(&[]);

        let end = (start + size).min(pages.len());
        let results = pages
            .get(start..end)
            .unwrap_or(&[])
            .iter()
            .map(|(page, _)| page.clone())
            .collect();
        let next_cursor = (end < pages.len()).then(|| end.to_string());

        Ok(QueryPage {
            results,
            next_cursor,
        })
    }
}
