//! FrameworkAgreement entity.
//!
//! An agreement moves from `draft` to `signed` when the supplier returns it
//! and to `countersigned` when the framework owner signs it back. The status
//! is derived from the return timestamps rather than stored.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::domain::foundation::{
    AgreementId, DomainError, ErrorCode, FrameworkId, SupplierId, Timestamp,
};

/// Derived agreement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementStatus {
    Draft,
    Signed,
    Countersigned,
}

impl AgreementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementStatus::Draft => "draft",
            AgreementStatus::Signed => "signed",
            AgreementStatus::Countersigned => "countersigned",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [Self::Draft, Self::Signed, Self::Countersigned]
            .into_iter()
            .find(|s| s.as_str() == value)
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values for an agreement that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewFrameworkAgreement {
    pub supplier_id: SupplierId,
    pub framework_id: FrameworkId,
}

/// The agreement between a supplier and a framework owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkAgreement {
    pub id: AgreementId,
    pub supplier_id: SupplierId,
    pub framework_id: FrameworkId,
    pub framework_slug: String,

    pub signed_agreement_details: Option<Map<String, Value>>,
    pub signed_agreement_path: Option<String>,
    pub signed_agreement_returned_at: Option<Timestamp>,

    pub countersigned_agreement_details: Option<Map<String, Value>>,
    pub countersigned_agreement_path: Option<String>,
    pub countersigned_agreement_returned_at: Option<Timestamp>,
}

impl FrameworkAgreement {
    /// A blank agreement, as created before the supplier signs anything.
    pub fn new(
        id: AgreementId,
        supplier_id: SupplierId,
        framework_id: FrameworkId,
        framework_slug: impl Into<String>,
    ) -> Self {
        Self {
            id,
            supplier_id,
            framework_id,
            framework_slug: framework_slug.into(),
            signed_agreement_details: None,
            signed_agreement_path: None,
            signed_agreement_returned_at: None,
            countersigned_agreement_details: None,
            countersigned_agreement_path: None,
            countersigned_agreement_returned_at: None,
        }
    }

    pub fn status(&self) -> AgreementStatus {
        if self.countersigned_agreement_returned_at.is_some() {
            AgreementStatus::Countersigned
        } else if self.signed_agreement_returned_at.is_some() {
            AgreementStatus::Signed
        } else {
            AgreementStatus::Draft
        }
    }

    /// Merges new signer details over the existing ones. `null` removes a key.
    pub fn merge_signed_details(&mut self, update: &Map<String, Value>) {
        let details = self.signed_agreement_details.get_or_insert_with(Map::new);
        merge_into(details, update);
    }

    /// Records the supplier's signed copy as returned.
    pub fn sign(&mut self, at: Timestamp) {
        self.signed_agreement_returned_at = Some(at);
    }

    /// Records the framework owner's countersignature.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the supplier has not signed yet.
    pub fn countersign(
        &mut self,
        details: Option<&Map<String, Value>>,
        path: Option<String>,
        at: Timestamp,
    ) -> Result<(), DomainError> {
        if self.signed_agreement_returned_at.is_none() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Can not countersign an agreement that has not been signed",
            ));
        }
        if let Some(details) = details {
            let existing = self.countersigned_agreement_details.get_or_insert_with(Map::new);
            merge_into(existing, details);
        }
        if path.is_some() {
            self.countersigned_agreement_path = path;
        }
        self.countersigned_agreement_returned_at = Some(at);
        Ok(())
    }

    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("id".into(), json!(self.id));
        doc.insert("supplierId".into(), json!(self.supplier_id));
        doc.insert("frameworkSlug".into(), json!(self.framework_slug));
        doc.insert("status".into(), json!(self.status()));

        let optional = [
            ("signedAgreementDetails", self.signed_agreement_details.clone().map(Value::Object)),
            ("signedAgreementPath", self.signed_agreement_path.clone().map(Value::String)),
            (
                "signedAgreementReturnedAt",
                self.signed_agreement_returned_at.map(|t| Value::String(t.to_api_string())),
            ),
            (
                "countersignedAgreementDetails",
                self.countersigned_agreement_details.clone().map(Value::Object),
            ),
            (
                "countersignedAgreementPath",
                self.countersigned_agreement_path.clone().map(Value::String),
            ),
            (
                "countersignedAgreementReturnedAt",
                self.countersigned_agreement_returned_at
                    .map(|t| Value::String(t.to_api_string())),
            ),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                doc.insert(key.into(), value);
            }
        }
        Value::Object(doc)
    }
}

fn merge_into(target: &mut Map<String, Value>, update: &Map<String, Value>) {
    for (key, value) in update {
        if value.is_null() {
            target.remove(key);
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}
