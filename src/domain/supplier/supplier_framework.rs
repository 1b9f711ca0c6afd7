//! A supplier's registration on a framework.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::agreement::FrameworkAgreement;
use crate::domain::foundation::{FrameworkId, SupplierId};

/// Join of supplier and framework, carrying the declaration and the
/// current framework agreement.
///
/// # Invariants
///
/// - At most one `FrameworkAgreement` per supplier framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierFramework {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub framework_id: FrameworkId,
    pub framework_slug: String,

    /// Answers to the selection questions.
    pub declaration: Option<Value>,

    /// Set once the supplier has been assessed; `None` while pending.
    pub on_framework: Option<bool>,

    pub agreement: Option<FrameworkAgreement>,
}

impl SupplierFramework {
    /// Registers fresh interest with no declaration.
    pub fn register(
        supplier_id: SupplierId,
        supplier_name: impl Into<String>,
        framework_id: FrameworkId,
        framework_slug: impl Into<String>,
    ) -> Self {
        Self {
            supplier_id,
            supplier_name: supplier_name.into(),
            framework_id,
            framework_slug: framework_slug.into(),
            declaration: None,
            on_framework: None,
            agreement: None,
        }
    }

    /// The `status` recorded in the declaration, if any.
    pub fn declaration_status(&self) -> Option<&str> {
        self.declaration.as_ref()?.get("status")?.as_str()
    }

    pub fn is_on_framework(&self) -> bool {
        self.on_framework == Some(true)
    }

    /// True when the current agreement has been returned signed.
    pub fn agreement_returned(&self) -> bool {
        self.agreement
            .as_ref()
            .map(|a| a.signed_agreement_returned_at.is_some())
            .unwrap_or(false)
    }

    pub fn to_document(&self, with_declaration: bool) -> Value {
        let mut doc = Map::new();
        doc.insert("supplierId".into(), json!(self.supplier_id));
        doc.insert("supplierName".into(), json!(self.supplier_name));
        doc.insert("frameworkSlug".into(), json!(self.framework_slug));
        doc.insert("onFramework".into(), json!(self.on_framework));
        if with_declaration {
            doc.insert("declaration".into(), self.declaration.clone().unwrap_or_else(|| json!({})));
        }

        let agreement = self.agreement.as_ref();
        doc.insert("agreementId".into(), json!(agreement.map(|a| a.id)));
        doc.insert("agreementReturned".into(), json!(self.agreement_returned()));
        doc.insert(
            "agreementReturnedAt".into(),
            json!(agreement
                .and_then(|a| a.signed_agreement_returned_at)
                .map(|t| t.to_api_string())),
        );
        doc.insert(
            "agreementDetails".into(),
            json!(agreement.and_then(|a| a.signed_agreement_details.clone())),
        );
        doc.insert(
            "agreementPath".into(),
            json!(agreement.and_then(|a| a.signed_agreement_path.clone())),
        );
        doc.insert(
            "agreementStatus".into(),
            json!(agreement.map(|a| a.status().as_str())),
        );
        doc.insert(
            "countersigned".into(),
            json!(agreement.map(|a| a.countersigned_agreement_returned_at.is_some()).unwrap_or(false)),
        );
        doc.insert(
            "countersignedAt".into(),
            json!(agreement
                .and_then(|a| a.countersigned_agreement_returned_at)
                .map(|t| t.to_api_string())),
        );
        doc.insert(
            "countersignedDetails".into(),
            json!(agreement.and_then(|a| a.countersigned_agreement_details.clone())),
        );
        doc.insert(
            "countersignedPath".into(),
            json!(agreement.and_then(|a| a.countersigned_agreement_path.clone())),
        );
        Value::Object(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AgreementId, Timestamp};

    fn registration() -> SupplierFramework {
        SupplierFramework::register(SupplierId::new(1), "Supplier 1", FrameworkId::new(2), "g-cloud-8")
    }

    #[test]
    fn new_registration_has_no_declaration_or_agreement() {
        let sf = registration();
        assert_eq!(sf.declaration_status(), None);
        assert!(!sf.is_on_framework());
        assert!(!sf.agreement_returned());
    }

    #[test]
    fn document_omits_declaration_on_request() {
        let mut sf = registration();
        sf.declaration = Some(json!({"status": "complete"}));
        assert!(sf.to_document(true).get("declaration").is_some());
        assert!(sf.to_document(false).get("declaration").is_none());
    }

    #[test]
    fn returned_agreement_is_reported() {
        let mut sf = registration();
        let mut agreement = FrameworkAgreement::new(AgreementId::new(9), sf.supplier_id, sf.framework_id, "g-cloud-8");
        agreement.signed_agreement_returned_at = Some(Timestamp::now());
        sf.agreement = Some(agreement);

        let doc = sf.to_document(false);
        assert_eq!(doc["agreementReturned"], json!(true));
        assert_eq!(doc["agreementStatus"], json!("signed"));
        assert_eq!(doc["agreementId"], json!(9));
    }
}
