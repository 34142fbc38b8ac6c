//! Notion REST API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use postcard_core::domain::PageProperties;
use postcard_core::ports::{
    DatabaseQuery, DocumentStore, DocumentStoreError, MAX_PAGE_SIZE, PageRef, QueryPage,
};

use super::properties::encode_properties;

const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Notion client configuration.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    /// Integration secret sent as a bearer token
    pub api_key: Option<String>,
    pub base_url: String,
    pub version: String,
    /// Per-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            version: NOTION_VERSION.to_string(),
            timeout: None,
        }
    }
}

impl NotionConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("NOTION_API_KEY").ok().filter(|v| !v.is_empty()),
            base_url: std::env::var("NOTION_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            version: NOTION_VERSION.to_string(),
            timeout: std::env::var("NOTION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

impl From<PageObject> for PageRef {
    fn from(page: PageObject) -> Self {
        PageRef {
            id: page.id,
            url: page.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<PageObject>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`DocumentStore`] backed by the Notion API.
///
/// Without an API key every call is skipped with a warning: creates succeed
/// without a page and queries come back empty.
pub struct NotionClient {
    client: reqwest::Client,
    config: NotionConfig,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Result<Self, DocumentStoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DocumentStoreError::Transport(e.to_string()))?;

        if config.api_key.is_none() {
            tracing::warn!("NOTION_API_KEY not set. Submissions will not be stored in Notion.");
        }

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, DocumentStoreError> {
        Self::new(NotionConfig::from_env())
    }

    /// API key, or `None` when the call should be skipped.
    fn credentials(&self, database_id: &str) -> Option<&str> {
        let key = self.config.api_key.as_deref()?;
        if database_id.is_empty() {
            return None;
        }
        Some(key)
    }

    fn request(&self, url: &str, api_key: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(api_key)
            .header("Notion-Version", &self.config.version)
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DocumentStoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| DocumentStoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.to_string());
            return Err(DocumentStoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DocumentStoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn create_page(
        &self,
        database_id: &str,
        properties: &PageProperties,
    ) -> Result<Option<PageRef>, DocumentStoreError> {
        let Some(api_key) = self.credentials(database_id) else {
            tracing::warn!(
                "NOTION_API_KEY and NOTION_DATABASE_ID must be set as environment variables."
            );
            return Ok(None);
        };

        let url = format!("{}/pages", self.config.base_url);
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": encode_properties(properties),
        });

        let page: PageObject = self.send(self.request(&url, api_key).json(&body)).await?;
        tracing::debug!(page_id = %page.id, "Created Notion page");

        Ok(Some(page.into()))
    }

    async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryPage, DocumentStoreError> {
        let Some(api_key) = self.credentials(database_id) else {
            tracing::warn!(
                "NOTION_API_KEY and NOTION_DATABASE_ID must be set as environment variables."
            );
            return Ok(QueryPage::default());
        };

        let url = format!("{}/databases/{}/query", self.config.base_url, database_id);
        let mut body = json!({ "page_size": query.page_size.clamp(1, MAX_PAGE_SIZE) });
        if let Some(cursor) = &query.start_cursor {
            body["start_cursor"] = json!(cursor);
        }

        let response: QueryResponse = self.send(self.request(&url, api_key).json(&body)).await?;

        Ok(QueryPage {
            results: response.results.into_iter().map(PageRef::from).collect(),
            next_cursor: response.next_cursor.filter(|_| response.has_more),
        })
    }
}
