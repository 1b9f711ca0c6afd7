//! AuditEvent record.
//!
//! # Invariants
//!
//! - Events are written in the same transaction as the change they describe.
//! - Events are never updated or deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::domain::foundation::{
    AgreementId, AuditEventId, CommandMetadata, DraftId, FrameworkId, ServiceId, SupplierId,
    Timestamp,
};

use super::AuditType;

/// Entity kinds an audit event can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditObjectType {
    Framework,
    Supplier,
    SupplierFramework,
    FrameworkAgreement,
    Service,
    DraftService,
}

impl AuditObjectType {
    pub const ALL: [AuditObjectType; 6] = [
        AuditObjectType::Framework,
        AuditObjectType::Supplier,
        AuditObjectType::SupplierFramework,
        AuditObjectType::FrameworkAgreement,
        AuditObjectType::Service,
        AuditObjectType::DraftService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditObjectType::Framework => "Framework",
            AuditObjectType::Supplier => "Supplier",
            AuditObjectType::SupplierFramework => "SupplierFramework",
            AuditObjectType::FrameworkAgreement => "FrameworkAgreement",
            AuditObjectType::Service => "Service",
            AuditObjectType::DraftService => "DraftService",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for AuditObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from an audit event to the entity it describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditObject {
    pub object_type: AuditObjectType,
    pub object_id: String,
}

impl AuditObject {
    pub fn new(object_type: AuditObjectType, object_id: impl Into<String>) -> Self {
        Self {
            object_type,
            object_id: object_id.into(),
        }
    }

    pub fn framework(id: FrameworkId) -> Self {
        Self::new(AuditObjectType::Framework, id.to_string())
    }

    pub fn supplier(id: SupplierId) -> Self {
        Self::new(AuditObjectType::Supplier, id.to_string())
    }

    pub fn supplier_framework(supplier_id: SupplierId, framework_id: FrameworkId) -> Self {
        Self::new(
            AuditObjectType::SupplierFramework,
            format!("{}/{}", supplier_id, framework_id),
        )
    }

    pub fn agreement(id: AgreementId) -> Self {
        Self::new(AuditObjectType::FrameworkAgreement, id.to_string())
    }

    pub fn service(id: &ServiceId) -> Self {
        Self::new(AuditObjectType::Service, id.as_str())
    }

    pub fn draft(id: DraftId) -> Self {
        Self::new(AuditObjectType::DraftService, id.to_string())
    }
}

/// An audit event about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEvent {
    pub audit_type: AuditType,
    pub user: String,
    pub data: Value,
    pub object: Option<AuditObject>,
}

impl NewAuditEvent {
    /// Records an action by the actor in `metadata`.
    pub fn new(audit_type: AuditType, metadata: &CommandMetadata, data: Value) -> Self {
        Self {
            audit_type,
            user: metadata.updated_by.clone(),
            data,
            object: None,
        }
    }

    pub fn for_object(mut self, object: AuditObject) -> Self {
        self.object = Some(object);
        self
    }
}

/// A stored audit event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: AuditEventId,
    pub audit_type: AuditType,
    pub user: String,
    pub data: Value,
    pub object: Option<AuditObject>,
    pub created_at: Timestamp,
}

impl AuditEvent {
    /// Links to archived services referenced from the payload.
    pub fn links(&self) -> Map<String, Value> {
        let mut links = Map::new();
        for (data_key, link_key) in [
            ("oldArchivedServiceId", "oldArchivedService"),
            ("newArchivedServiceId", "newArchivedService"),
        ] {
            if let Some(id) = self.data.get(data_key).and_then(Value::as_i64) {
                links.insert(link_key.to_string(), json!(format!("/archived-services/{}", id)));
            }
        }
        links
    }

    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("id".into(), json!(self.id));
        doc.insert("type".into(), json!(self.audit_type));
        doc.insert("user".into(), json!(self.user));
        doc.insert("data".into(), self.data.clone());
        doc.insert("createdAt".into(), json!(self.created_at.to_api_string()));
        if let Some(object) = &self.object {
            doc.insert("objectType".into(), json!(object.object_type.as_str()));
            doc.insert("objectId".into(), json!(object.object_id));
        }
        doc.insert("links".into(), Value::Object(self.links()));
        Value::Object(doc)
    }
}

/// Criteria for reading the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    pub audit_type: Option<AuditType>,
    pub date: Option<NaiveDate>,
    pub object: Option<AuditObject>,
    pub latest_first: bool,
    pub offset: u64,
    pub limit: u64,
}

impl AuditQuery {
    /// The most recent event of a type for an object.
    pub fn latest(audit_type: AuditType, object: AuditObject) -> Self {
        Self {
            audit_type: Some(audit_type),
            date: None,
            object: Some(object),
            latest_first: true,
            offset: 0,
            limit: 1,
        }
    }

    /// The most recent event of any type for an object.
    pub fn latest_for(object: AuditObject) -> Self {
        Self {
            audit_type: None,
            date: None,
            object: Some(object),
            latest_first: true,
            offset: 0,
            limit: 1,
        }
    }

    /// In-process equivalent of the store's filter (ignores paging).
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(audit_type) = self.audit_type {
            if event.audit_type != audit_type {
                return false;
            }
        }
        if let Some(date) = self.date {
            if event.created_at.as_datetime().date_naive() != date {
                return false;
            }
        }
        if let Some(object) = &self.object {
            if event.object.as_ref() != Some(object) {
                return false;
            }
        }
        true
    }
}
