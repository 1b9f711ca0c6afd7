//! HTTP search index client.
//!
//! Services are indexed with `PUT {base_url}/{index}/services/{id}` carrying
//! `{"service": document}` and removed with `DELETE` on the same path.
//!
//! ```ignore
//! let config = HttpSearchIndexConfig::new("http://localhost:5001", "g-cloud")
//!     .with_auth_token(token)
//!     .with_timeout(Duration::from_secs(10));
//!
//! let index = HttpSearchIndex::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{DomainError, ErrorCode, ServiceId};
use crate::ports::SearchIndex;

/// Configuration for the HTTP search client.
#[derive(Debug, Clone)]
pub struct HttpSearchIndexConfig {
    /// Search API root, without a trailing slash.
    pub base_url: String,
    /// Index that holds service documents.
    pub index: String,
    auth_token: Option<SecretString>,
    pub timeout: Duration,
}

impl HttpSearchIndexConfig {
    pub fn new(base_url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index: index.into(),
            auth_token: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the bearer token sent with each request.
    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct IndexRequest<'a> {
    service: &'a Value,
}

/// Search API client implementing `SearchIndex`.
pub struct HttpSearchIndex {
    config: HttpSearchIndexConfig,
    client: Client,
}

impl HttpSearchIndex {
    pub fn new(config: HttpSearchIndexConfig) -> Result<Self, DomainError> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to create search client: {}", e),
            )
        })?;
        Ok(Self { config, client })
    }

    fn service_url(&self, id: &ServiceId) -> String {
        format!(
            "{}/{}/services/{}",
            self.config.base_url, self.config.index, id
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn check_status(&self, id: &ServiceId, response: Response) -> Result<(), DomainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(DomainError::new(
            ErrorCode::SearchIndexError,
            format!("Search API returned {} for service {}: {}", status, id, body),
        ))
    }
}

fn request_failed(id: &ServiceId, e: reqwest::Error) -> DomainError {
    let reason = if e.is_timeout() { "timed out" } else { "failed" };
    DomainError::new(
        ErrorCode::SearchIndexError,
        format!("Search request for service {} {}: {}", id, reason, e),
    )
}

#[async_trait]
impl SearchIndex for HttpSearchIndex {
    async fn index(&self, id: &ServiceId, document: &Value) -> Result<(), DomainError> {
        let request = self
            .client
            .put(self.service_url(id))
            .json(&IndexRequest { service: document });
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| request_failed(id, e))?;
        self.check_status(id, response).await
    }

    async fn delete(&self, id: &ServiceId) -> Result<(), DomainError> {
        let request = self.client.delete(self.service_url(id));
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| request_failed(id, e))?;
        self.check_status(id, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_builder_works() {
        let config = HttpSearchIndexConfig::new("http://search.local/", "g-cloud")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url, "http://search.local");
        assert_eq!(config.index, "g-cloud");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn service_url_includes_index_and_id() {
        let index = HttpSearchIndex::new(HttpSearchIndexConfig::new("http://search.local", "g-cloud"))
            .unwrap();
        let id = ServiceId::new("1234567890123456").unwrap();

        assert_eq!(
            index.service_url(&id),
            "http://search.local/g-cloud/services/1234567890123456"
        );
    }

    #[test]
    fn index_request_wraps_document() {
        let document = json!({"id": "1234567890123456"});
        let body = serde_json::to_value(IndexRequest { service: &document }).unwrap();
        assert_eq!(body, json!({"service": {"id": "1234567890123456"}}));
    }
}
