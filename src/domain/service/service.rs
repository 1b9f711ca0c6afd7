//! Service entity and its archived snapshots.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::foundation::{ArchivedServiceId, ServiceId, ServiceStatus, SupplierId, Timestamp};
use crate::domain::framework::{FrameworkSummary, Lot};
use crate::domain::validation::SchemaName;

use super::data::{merge_update, ServiceData};
use super::DraftService;

/// A supplier's offer as buyers see it.
///
/// # Invariants
///
/// - `service_id` is globally unique and never changes.
/// - `data` never contains column-backed keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: ServiceId,
    pub supplier_id: SupplierId,

    /// Always the supplier record's name, whatever the content claims.
    pub supplier_name: String,

    pub framework: FrameworkSummary,
    pub lot: Lot,
    pub status: ServiceStatus,
    pub data: ServiceData,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Service {
    /// Creates the live service for a fresh draft being published.
    pub fn from_draft(service_id: ServiceId, draft: &DraftService, now: Timestamp) -> Self {
        Self {
            service_id,
            supplier_id: draft.supplier_id,
            supplier_name: draft.supplier_name.clone(),
            framework: draft.framework.clone(),
            lot: draft.lot.clone(),
            status: ServiceStatus::Published,
            data: draft.data.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the content with a draft copied from this service.
    pub fn replace_data(&mut self, data: ServiceData, now: Timestamp) {
        self.data = data;
        self.updated_at = now;
    }

    /// Merges a content update.
    pub fn update_data(&mut self, update: &ServiceData, now: Timestamp) {
        self.data = merge_update(&self.data, update);
        self.updated_at = now;
    }

    /// Changes status, returning the previous one.
    pub fn set_status(&mut self, status: ServiceStatus, now: Timestamp) -> ServiceStatus {
        let old = self.status;
        self.status = status;
        self.updated_at = now;
        old
    }

    /// Only published services on live frameworks belong in the search index.
    pub fn is_searchable(&self) -> bool {
        self.status.is_published() && self.framework.status.is_live()
    }

    pub fn schema_name(&self) -> SchemaName {
        SchemaName::services(&self.framework.slug, &self.lot.slug)
    }

    /// Value for the `serviceName` field, or an empty string.
    pub fn name(&self) -> &str {
        self.data.get("serviceName").and_then(Value::as_str).unwrap_or("")
    }

    /// The document returned by the API and sent to the search index.
    pub fn to_document(&self) -> Value {
        self.document_with_link(format!("/services/{}", self.service_id))
    }

    fn document_with_link(&self, self_link: String) -> Value {
        let mut doc = self.data.clone();
        let columns = [
            ("id", json!(self.service_id)),
            ("supplierId", json!(self.supplier_id)),
            ("supplierName", json!(self.supplier_name)),
            ("frameworkSlug", json!(self.framework.slug)),
            ("frameworkFramework", json!(self.framework.framework)),
            ("frameworkName", json!(self.framework.name)),
            ("frameworkStatus", json!(self.framework.status)),
            ("lot", json!(self.lot.slug)),
            ("lotSlug", json!(self.lot.slug)),
            ("lotName", json!(self.lot.name)),
            ("status", json!(self.status)),
            ("createdAt", json!(self.created_at.to_api_string())),
            ("updatedAt", json!(self.updated_at.to_api_string())),
            ("links", json!({"self": self_link})),
        ];
        for (key, value) in columns {
            doc.insert(key.to_string(), value);
        }
        Value::Object(doc)
    }
}

/// An immutable snapshot of a service taken after a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedService {
    pub id: ArchivedServiceId,
    pub service: Service,
}

impl ArchivedService {
    pub fn to_document(&self) -> Value {
        self.service
            .document_with_link(format!("/archived-services/{}", self.id))
    }
}
