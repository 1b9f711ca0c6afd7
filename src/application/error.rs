//! Application-level error type.
//!
//! Handlers return `ApplicationError`. The HTTP layer maps each variant to a
//! status code and an `{"error": ...}` body.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request is malformed or not allowed in the current state.
    #[error("{0}")]
    BadRequest(String),

    /// Document content failed schema validation.
    #[error("Document failed validation")]
    Invalid(ValidationErrors),

    /// A concurrent write won.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApplicationError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApplicationError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApplicationError::BadRequest(message.into())
    }
}

impl From<ValidationError> for ApplicationError {
    fn from(err: ValidationError) -> Self {
        ApplicationError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn value_object_errors_become_bad_requests() {
        let err: ApplicationError = ValidationError::invalid_value("status", "bogus").into();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m.contains("bogus")));
    }

    #[test]
    fn domain_errors_keep_their_code() {
        let err: ApplicationError =
            DomainError::new(ErrorCode::SerializationFailure, "retry").into();
        match err {
            ApplicationError::Domain(e) => assert_eq!(e.code, ErrorCode::SerializationFailure),
            other => panic!("unexpected {:?}", other),
        }
    }
}
