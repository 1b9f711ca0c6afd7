//! Service id generation port.

use crate::domain::foundation::{DomainError, ServiceId};

/// Produces candidate ids for newly published services.
///
/// Candidates are not guaranteed unique; callers check the store and ask
/// again on collision.
pub trait ServiceIdGenerator: Send + Sync {
    fn generate(&self) -> Result<ServiceId, DomainError>;
}
