//! Schema naming and strictness.

use std::fmt;

/// Name of an embedded JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaName(String);

impl SchemaName {
    /// Schema for service content on a lot of a framework.
    pub fn services(framework_slug: &str, lot_slug: &str) -> Self {
        Self(format!("services-{}-{}", framework_slug, lot_slug.to_lowercase()))
    }

    /// Schema for the agreement metadata a framework publishes.
    pub fn framework_agreement_details() -> Self {
        Self("framework-agreement-details".to_string())
    }

    /// Schema for the details a supplier provides when signing.
    pub fn agreement_details() -> Self {
        Self("agreement-details".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How strictly a document is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every required field and the top-level `anyOf` are enforced.
    Full,
    /// Only the listed questions are required, and only if the schema
    /// itself requires them. The top-level `anyOf` is skipped.
    Partial { required: Vec<String> },
}

impl ValidationMode {
    /// Partial mode with nothing required.
    pub fn lenient() -> Self {
        ValidationMode::Partial { required: Vec::new() }
    }

    pub fn for_page(page_questions: Option<Vec<String>>) -> Self {
        ValidationMode::Partial {
            required: page_questions.unwrap_or_default(),
        }
    }
}
