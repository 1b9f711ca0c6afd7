//! No-op search index.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::{DomainError, ServiceId};
use crate::ports::SearchIndex;

/// Accepts and discards every request.
#[derive(Debug, Clone, Default)]
pub struct DisabledSearchIndex;

#[async_trait]
impl SearchIndex for DisabledSearchIndex {
    async fn index(&self, id: &ServiceId, _document: &Value) -> Result<(), DomainError> {
        tracing::debug!(service_id = %id, "Search disabled, skipping index");
        Ok(())
    }

    async fn delete(&self, id: &ServiceId) -> Result<(), DomainError> {
        tracing::debug!(service_id = %id, "Search disabled, skipping delete");
        Ok(())
    }
}
