//! Framework entity.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::foundation::{FrameworkId, FrameworkStatus, LotId};

/// A category of service within a framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub id: LotId,
    pub slug: String,
    pub name: String,

    /// Suppliers may hold at most one draft on a lot with this flag.
    pub one_service_limit: bool,
}

impl Lot {
    pub fn to_document(&self) -> Value {
        json!({
            "id": self.id,
            "slug": self.slug,
            "name": self.name,
            "oneServiceLimit": self.one_service_limit,
        })
    }
}

/// A procurement round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Framework {
    pub id: FrameworkId,

    /// Unique, URL-safe identifier such as `g-cloud-7`.
    pub slug: String,

    pub name: String,

    /// Framework family, e.g. `g-cloud` or `digital-outcomes-and-specialists`.
    pub framework: String,

    pub status: FrameworkStatus,

    pub clarification_questions_open: bool,

    /// Agreement metadata; carries `frameworkAgreementVersion` once agreements can be signed.
    pub framework_agreement_details: Option<Value>,

    pub lots: Vec<Lot>,
}

impl Framework {
    /// Finds one of this framework's lots by slug.
    pub fn lot(&self, slug: &str) -> Option<&Lot> {
        self.lots.iter().find(|lot| lot.slug == slug)
    }

    /// Version suppliers sign against, if agreements are in use.
    pub fn agreement_version(&self) -> Option<&str> {
        self.framework_agreement_details
            .as_ref()?
            .get("frameworkAgreementVersion")?
            .as_str()
            .filter(|v| !v.is_empty())
    }

    pub fn summary(&self) -> FrameworkSummary {
        FrameworkSummary {
            id: self.id,
            slug: self.slug.clone(),
            name: self.name.clone(),
            framework: self.framework.clone(),
            status: self.status,
        }
    }

    /// Applies a whitelisted update.
    pub fn apply(&mut self, update: &FrameworkUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(open) = update.clarification_questions_open {
            self.clarification_questions_open = open;
        }
        if let Some(details) = &update.framework_agreement_details {
            self.framework_agreement_details = Some(details.clone());
        }
    }

    pub fn to_document(&self) -> Value {
        json!({
            "id": self.id,
            "slug": self.slug,
            "name": self.name,
            "framework": self.framework,
            "status": self.status,
            "clarificationQuestionsOpen": self.clarification_questions_open,
            "frameworkAgreementDetails": self.framework_agreement_details,
            "lots": self.lots.iter().map(Lot::to_document).collect::<Vec<_>>(),
        })
    }
}

/// The parts of a framework other entities display alongside themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSummary {
    pub id: FrameworkId,
    pub slug: String,
    pub name: String,
    pub framework: String,
    pub status: FrameworkStatus,
}

/// Values for a framework that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFramework {
    pub slug: String,
    pub name: String,
    pub framework: String,
    pub status: FrameworkStatus,
    pub clarification_questions_open: bool,
    pub lots: Vec<Lot>,
}

/// Whitelisted framework changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameworkUpdate {
    pub status: Option<FrameworkStatus>,
    pub clarification_questions_open: Option<bool>,
    pub framework_agreement_details: Option<Value>,
}

impl FrameworkUpdate {
    pub const ALLOWED_KEYS: [&'static str; 3] =
        ["status", "clarificationQuestionsOpen", "frameworkAgreementDetails"];

    /// Parses a client payload, rejecting anything outside the whitelist.
    ///
    /// # Errors
    ///
    /// Returns the client-facing message for an empty payload, unknown keys,
    /// or values of the wrong shape.
    pub fn parse(payload: &Map<String, Value>) -> Result<Self, String> {
        if payload.is_empty() {
            return Err("Framework update expects a payload".to_string());
        }

        let mut invalid: Vec<&str> = payload
            .keys()
            .map(String::as_str)
            .filter(|key| !Self::ALLOWED_KEYS.contains(key))
            .collect();
        if !invalid.is_empty() {
            invalid.sort_unstable();
            return Err(format!(
                "Invalid keys for framework update: '{}'",
                invalid.join("', '")
            ));
        }

        let status = match payload.get("status") {
            None => None,
            Some(Value::String(s)) => Some(s.parse::<FrameworkStatus>().map_err(|e| e.to_string())?),
            Some(other) => return Err(format!("'{}' is not a valid framework status", other)),
        };

        let clarification_questions_open = match payload.get("clarificationQuestionsOpen") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => {
                return Err(format!("'{}' is not a valid clarificationQuestionsOpen value", other))
            }
        };

        Ok(Self {
            status,
            clarification_questions_open,
            framework_agreement_details: payload.get("frameworkAgreementDetails").cloned(),
        })
    }
}
