//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, status enums, and error types
//! that form the vocabulary of the marketplace domain.

mod command;
mod errors;
mod framework_status;
mod ids;
mod service_status;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use framework_status::FrameworkStatus;
pub use ids::{
    AgreementId, ArchivedServiceId, AuditEventId, DraftId, FrameworkId, LotId, ServiceId,
    SupplierId, UserId, GENERATED_SERVICE_ID_LENGTH,
};
pub use service_status::{DraftStatus, ServiceStatus};
pub use timestamp::{Timestamp, API_DATETIME_FORMAT};
