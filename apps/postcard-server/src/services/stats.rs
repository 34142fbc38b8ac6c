use std::sync::Arc;

use postcard_core::DomainError;
use postcard_core::domain::StoreKey;
use postcard_core::ports::{DatabaseQuery, DocumentStore, DocumentStoreError};
use postcard_infra::StoreCounter;

/// Upper bound on cursor hops for one count.
pub const MAX_QUERY_PAGES: usize = 10_000;

/// Admin statistics. The remote database is the source of truth for totals.
#[derive(Clone)]
pub struct StatsService {
    documents: Arc<dyn DocumentStore>,
    counter: StoreCounter,
    database_id: String,
}

impl StatsService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        counter: StoreCounter,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            counter,
            database_id: database_id.into(),
        }
    }

    /// Count every remote page and overwrite the local submission counter.
    pub async fn total_submissions(&self) -> Result<u64, DomainError> {
        let mut query = DatabaseQuery::default();
        let mut total: u64 = 0;

        for _ in 0..MAX_QUERY_PAGES {
            let page = self
                .documents
                .query_database(&self.database_id, &query)
                .await?;
            total += page.results.len() as u64;

            match page.next_cursor {
                Some(cursor) => query.start_cursor = Some(cursor),
                None => {
                    self.counter
                        .overwrite(&StoreKey::submissions_count(), total)
                        .await?;
                    tracing::debug!(total, "Recounted submissions");
                    return Ok(total);
                }
            }
        }

        Err(DocumentStoreError::Decode(format!(
            "query cursor still open after {} pages",
            MAX_QUERY_PAGES
        ))
        .into())
    }

    pub async fn page_visits(&self, page: &str) -> Result<u64, DomainError> {
        Ok(self.counter.get(&StoreKey::visits(page)).await?)
    }
}
