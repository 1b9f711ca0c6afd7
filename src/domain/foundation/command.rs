//! Command infrastructure for application handlers.
//!
//! Every state-changing request names the person or system making the
//! change (`updated_by`). That actor is recorded on the audit event written
//! alongside the change, so handlers take it as `CommandMetadata` rather
//! than as a loose string parameter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Actor recorded as the `user` of the resulting audit event.
    pub updated_by: String,

    /// Links log lines for a single request. Taken from `x-request-id` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandMetadata {
    /// Creates metadata for an actor.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` when the actor is blank.
    pub fn new(updated_by: impl Into<String>) -> Result<Self, ValidationError> {
        let updated_by = updated_by.into();
        if updated_by.trim().is_empty() {
            return Err(ValidationError::empty_field("updated_by"));
        }
        Ok(Self {
            updated_by,
            correlation_id: None,
        })
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture for a fixed actor.
    pub fn test_fixture() -> Self {
        Self::new("joeblogs")
            .map(|m| m.with_correlation_id("test-correlation-id"))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_actor() {
        let metadata = CommandMetadata::new("joeblogs").unwrap();
        assert_eq!(metadata.updated_by, "joeblogs");
        assert!(metadata.correlation_id.is_none());
    }

    #[test]
    fn blank_actor_is_rejected() {
        assert!(CommandMetadata::new("   ").is_err());
    }

    #[test]
    fn correlation_id_is_kept_when_set() {
        let metadata = CommandMetadata::new("x").unwrap().with_correlation_id("req-1");
        assert_eq!(metadata.correlation_id(), "req-1");
    }

    #[test]
    fn correlation_id_generates_if_missing() {
        let metadata = CommandMetadata::new("x").unwrap();
        assert!(!metadata.correlation_id().is_empty());
    }
}
