//! In-memory search index that records calls.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::{DomainError, ErrorCode, ServiceId};
use crate::ports::SearchIndex;

/// A request received by the recording index.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCall {
    Index { id: ServiceId, document: Value },
    Delete { id: ServiceId },
}

/// Records every request, optionally failing them all.
#[derive(Debug, Default)]
pub struct RecordingSearchIndex {
    calls: Mutex<Vec<SearchCall>>,
    fail: bool,
}

impl RecordingSearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index that records requests and then rejects them.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Ids passed to `index`, in call order.
    pub fn indexed_ids(&self) -> Vec<ServiceId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SearchCall::Index { id, .. } => Some(id),
                SearchCall::Delete { .. } => None,
            })
            .collect()
    }

    /// Ids passed to `delete`, in call order.
    pub fn deleted_ids(&self) -> Vec<ServiceId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SearchCall::Delete { id } => Some(id),
                SearchCall::Index { .. } => None,
            })
            .collect()
    }

    fn record(&self, call: SearchCall) -> Result<(), DomainError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail {
            return Err(DomainError::new(
                ErrorCode::SearchIndexError,
                "Search index unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for RecordingSearchIndex {
    async fn index(&self, id: &ServiceId, document: &Value) -> Result<(), DomainError> {
        self.record(SearchCall::Index {
            id: id.clone(),
            document: document.clone(),
        })
    }

    async fn delete(&self, id: &ServiceId) -> Result<(), DomainError> {
        self.record(SearchCall::Delete { id: id.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service_id() -> ServiceId {
        ServiceId::new("1234567890123456").unwrap()
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let index = RecordingSearchIndex::new();
        index.index(&service_id(), &json!({"id": "1234567890123456"})).await.unwrap();
        index.delete(&service_id()).await.unwrap();

        assert_eq!(index.indexed_ids(), vec![service_id()]);
        assert_eq!(index.deleted_ids(), vec![service_id()]);
        assert_eq!(index.calls().len(), 2);
    }

    #[tokio::test]
    async fn failing_index_still_records() {
        let index = RecordingSearchIndex::failing();
        let err = index.delete(&service_id()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::SearchIndexError);
        assert_eq!(index.deleted_ids(), vec![service_id()]);
    }
}
