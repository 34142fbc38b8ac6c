use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use postcard_core::DomainError;
use postcard_core::domain::{StoreKey, SubmissionForm, SubmissionRecord};
use postcard_core::ports::DocumentStore;
use postcard_infra::StoreCounter;

/// Decode a postcard body. Only a JSON object is accepted: serde would
/// otherwise fill the struct positionally from an array.
fn parse_form(body: &[u8]) -> Result<SubmissionForm, DomainError> {
    let object: Map<String, Value> = serde_json::from_slice(body)
        .map_err(|e| DomainError::MalformedSubmission(e.to_string()))?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| DomainError::MalformedSubmission(e.to_string()))
}

/// Forwards postcards to the document store and keeps the running total.
#[derive(Clone)]
pub struct SubmissionService {
    documents: Arc<dyn DocumentStore>,
    counter: StoreCounter,
    database_id: String,
}

impl SubmissionService {
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

    /// Store one postcard and return the new total.
    ///
    /// The counter is only touched once the remote page exists.
    pub async fn submit(&self, body: &[u8], client: &str) -> Result<u64, DomainError> {
        let form = parse_form(body)?;
        let record = SubmissionRecord::new(form, client, Utc::now());

        let page = self
            .documents
            .create_page(&self.database_id, &record.to_properties())
            .await?;

        tracing::info!(
            recipient = %record.recipient_name,
            state = %record.recipient_state,
            sender = %record.sender_name,
            sender_ip = %record.sender_ip,
            submitted_at = %record.submitted_at_iso(),
            page_id = ?page.as_ref().map(|p| p.id.as_str()),
            "New submission"
        );

        let total = self.counter.increment(&StoreKey::submissions_count()).await?;
        Ok(total)
    }
}
