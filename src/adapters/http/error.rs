//! Conversion of application errors into HTTP responses.
//!
//! Every error body has the shape `{"error": <message | error map>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::application::ApplicationError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(ApplicationError::bad_request(message))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self(ApplicationError::not_found(message))
    }

    fn status_and_body(&self) -> (StatusCode, Value) {
        match &self.0 {
            ApplicationError::NotFound(message) => (StatusCode::NOT_FOUND, json!(message)),
            ApplicationError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!(message)),
            ApplicationError::Invalid(errors) => (StatusCode::BAD_REQUEST, errors.to_json()),
            ApplicationError::Conflict(message) => (StatusCode::CONFLICT, json!(message)),
            ApplicationError::Domain(err) => domain_status_and_body(err),
        }
    }
}

fn domain_status_and_body(err: &DomainError) -> (StatusCode, Value) {
    let status = match err.code {
        code if code.is_not_found() => StatusCode::NOT_FOUND,
        ErrorCode::SerializationFailure => StatusCode::CONFLICT,
        ErrorCode::AlreadyExists
        | ErrorCode::InvalidStateTransition
        | ErrorCode::ValidationFailed
        | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(code = %err.code, error = %err.message, "Request failed");
        return (status, json!("Internal server error"));
    }
    (status, json!(err.message))
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(ApplicationError::Domain(err))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(ApplicationError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        (status, Json(json!({ "error": error }))).into_response()
    }
}
