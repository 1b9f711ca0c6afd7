//! DraftService entity.
//!
//! Drafts are a supplier's scratch copy of a service. A fresh draft goes
//! `not-submitted -> submitted` and is published into a new service. A draft
//! copied from a live service carries that service's id and status, and
//! publishing it overwrites the live service.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::foundation::{
    DomainError, DraftId, DraftStatus, ErrorCode, FrameworkId, LotId, ServiceId, SupplierId,
    Timestamp,
};
use crate::domain::framework::{DraftSummary, FrameworkSummary, Lot};
use crate::domain::validation::{SchemaName, ValidationMode};

use super::data::{merge_update, ServiceData};
use super::Service;

/// Content that is not carried over when a draft is copied.
pub const COPY_EXCLUDED_FIELDS: &[&str] = &[
    "serviceSummary",
    "termsAndConditionsDocumentURL",
    "pricingDocumentURL",
    "serviceDefinitionDocumentURL",
    "sfiaRateDocumentURL",
];

const COPY_SUFFIX: &str = " copy";
const MAX_NAME_LENGTH_FOR_SUFFIX: usize = 95;

/// Values for a draft that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDraftService {
    pub service_id: Option<ServiceId>,
    pub supplier_id: SupplierId,
    pub framework_id: FrameworkId,
    pub lot_id: LotId,
    pub status: DraftStatus,
    pub data: ServiceData,
}

impl NewDraftService {
    /// A new submission that has not been through full validation.
    pub fn fresh(
        supplier_id: SupplierId,
        framework_id: FrameworkId,
        lot_id: LotId,
        data: ServiceData,
    ) -> Self {
        Self {
            service_id: None,
            supplier_id,
            framework_id,
            lot_id,
            status: DraftStatus::NotSubmitted,
            data,
        }
    }

    /// A draft for editing an existing live service.
    pub fn from_service(service: &Service) -> Self {
        Self {
            service_id: Some(service.service_id.clone()),
            supplier_id: service.supplier_id,
            framework_id: service.framework.id,
            lot_id: service.lot.id,
            status: service.status.into(),
            data: service.data.clone(),
        }
    }
}

/// A draft service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftService {
    pub id: DraftId,

    /// Live service this draft was copied from, if any.
    pub service_id: Option<ServiceId>,

    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub framework: FrameworkSummary,
    pub lot: Lot,
    pub status: DraftStatus,
    pub data: ServiceData,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DraftService {
    /// Builds an independent copy of this draft.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` for lots limited to one service per supplier.
    pub fn copy(&self) -> Result<NewDraftService, DomainError> {
        if self.lot.one_service_limit {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot copy a '{}' draft", self.lot.slug),
            ));
        }

        let mut data = self.data.clone();
        for key in COPY_EXCLUDED_FIELDS {
            data.remove(*key);
        }
        if let Some(Value::String(name)) = data.get_mut("serviceName") {
            if name.chars().count() <= MAX_NAME_LENGTH_FOR_SUFFIX {
                name.push_str(COPY_SUFFIX);
            }
        }

        Ok(NewDraftService {
            service_id: None,
            supplier_id: self.supplier_id,
            framework_id: self.framework.id,
            lot_id: self.lot.id,
            status: DraftStatus::NotSubmitted,
            data,
        })
    }

    /// Merges an update into the content.
    pub fn apply_update(&mut self, update: &ServiceData, now: Timestamp) {
        self.data = merge_update(&self.data, update);
        self.updated_at = now;
    }

    /// Submitted drafts must stay complete; others are checked page by page.
    pub fn validation_mode(&self, page_questions: Option<Vec<String>>) -> ValidationMode {
        if self.status.is_submitted() {
            ValidationMode::Full
        } else {
            ValidationMode::for_page(page_questions)
        }
    }

    pub fn set_status(&mut self, status: DraftStatus, now: Timestamp) {
        self.status = status;
        self.updated_at = now;
    }

    /// Checks that publishing is allowed.
    ///
    /// Copies of live services can always be published. Fresh drafts must be submitted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` for fresh drafts that are not submitted.
    pub fn ensure_publishable(&self) -> Result<(), DomainError> {
        if self.service_id.is_none() && !self.status.is_submitted() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Cannot be published: not submitted",
            ));
        }
        Ok(())
    }

    pub fn schema_name(&self) -> SchemaName {
        SchemaName::services(&self.framework.slug, &self.lot.slug)
    }

    pub fn summary(&self) -> DraftSummary {
        DraftSummary {
            supplier_id: self.supplier_id,
            status: self.status,
            lot_slug: self.lot.slug.clone(),
        }
    }

    pub fn to_document(&self) -> Value {
        let mut doc = self.data.clone();
        let base = format!("/draft-services/{}", self.id);
        let columns = [
            ("id", json!(self.id)),
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
            (
                "links",
                json!({
                    "self": base,
                    "publish": format!("{}/publish", base),
                    "complete": format!("{}/complete", base),
                    "copy": format!("{}/copy", base),
                }),
            ),
        ];
        for (key, value) in columns {
            doc.insert(key.to_string(), value);
        }
        if let Some(service_id) = &self.service_id {
            doc.insert("serviceId".to_string(), json!(service_id));
        }
        Value::Object(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::FrameworkStatus;

    fn draft(lot_slug: &str, one_service_limit: bool) -> DraftService {
        let mut data = ServiceData::new();
        data.insert("serviceName".into(), json!("My service"));
        data.insert("serviceSummary".into(), json!("Summary"));
        data.insert("pricingDocumentURL".into(), json!("http://example.com/pricing.pdf"));
        data.insert("serviceFeatures".into(), json!(["a", "b"]));
        DraftService {
            id: DraftId::new(10),
            service_id: None,
            supplier_id: SupplierId::new(1),
            supplier_name: "Supplier 1".into(),
            framework: FrameworkSummary {
                id: FrameworkId::new(5),
                slug: "g-cloud-7".into(),
                name: "G-Cloud 7".into(),
                framework: "g-cloud".into(),
                status: FrameworkStatus::Open,
            },
            lot: Lot {
                id: LotId::new(4),
                slug: lot_slug.into(),
                name: lot_slug.into(),
                one_service_limit,
            },
            status: DraftStatus::Submitted,
            data,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    #[test]
    fn copy_resets_status_and_strips_documents() {
        let copy = draft("scs", false).copy().unwrap();
        assert_eq!(copy.status, DraftStatus::NotSubmitted);
        assert_eq!(copy.data["serviceName"], json!("My service copy"));
        assert!(!copy.data.contains_key("serviceSummary"));
        assert!(!copy.data.contains_key("pricingDocumentURL"));
        assert_eq!(copy.data["serviceFeatures"], json!(["a", "b"]));
        assert_eq!(copy.service_id, None);
    }

    #[test]
    fn copy_keeps_long_names_unchanged() {
        let mut original = draft("scs", false);
        let long_name = "x".repeat(96);
        original.data.insert("serviceName".into(), json!(long_name.clone()));
        assert_eq!(original.copy().unwrap().data["serviceName"], json!(long_name));
    }

    #[test]
    fn one_service_lots_cannot_be_copied() {
        let err = draft("digital-specialists", true).copy().unwrap_err();
        assert_eq!(err.message, "Cannot copy a 'digital-specialists' draft");
    }

    #[test]
    fn submitted_drafts_are_fully_validated() {
        let mut d = draft("scs", false);
        assert_eq!(d.validation_mode(Some(vec!["serviceName".into()])), ValidationMode::Full);
        d.status = DraftStatus::NotSubmitted;
        assert_eq!(
            d.validation_mode(Some(vec!["serviceName".into()])),
            ValidationMode::Partial { required: vec!["serviceName".into()] }
        );
    }

    #[test]
    fn fresh_drafts_must_be_submitted_to_publish() {
        let mut d = draft("scs", false);
        assert!(d.ensure_publishable().is_ok());
        d.status = DraftStatus::Published;
        assert!(d.ensure_publishable().is_err());
        d.service_id = Some(ServiceId::new("1234567890123456").unwrap());
        assert!(d.ensure_publishable().is_ok());
    }

    #[test]
    fn document_links_workflow_actions() {
        let doc = draft("scs", false).to_document();
        assert_eq!(doc["id"], json!(10));
        assert_eq!(doc["links"]["publish"], json!("/draft-services/10/publish"));
        assert!(doc.get("serviceId").is_none());
    }

    #[test]
    fn draft_from_service_inherits_status() {
        use crate::domain::foundation::ServiceStatus;
        let service = super::super::service::fixtures::service(ServiceStatus::Enabled, FrameworkStatus::Live);
        let new_draft = NewDraftService::from_service(&service);
        assert_eq!(new_draft.status, DraftStatus::Enabled);
        assert_eq!(new_draft.service_id, Some(service.service_id));
    }
}
