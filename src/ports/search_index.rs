//! Search index port.
//!
//! The search service is an external collaborator. Callers index a service
//! only after the transaction that changed it has committed, and treat
//! failures as non-fatal.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::{DomainError, ServiceId};

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Adds or replaces the document for a service.
    ///
    /// # Errors
    ///
    /// - `SearchIndexError` if the search service rejects the request
    async fn index(&self, id: &ServiceId, document: &Value) -> Result<(), DomainError>;

    /// Removes a service from the index.
    async fn delete(&self, id: &ServiceId) -> Result<(), DomainError>;
}
