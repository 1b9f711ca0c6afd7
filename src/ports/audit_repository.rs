//! Audit event repository port.
//!
//! Append-only: events are never updated or deleted.

use async_trait::async_trait;

use crate::domain::audit::{AuditEvent, AuditQuery, NewAuditEvent};
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait AuditEventRepository: Send {
    /// Appends an event stamped with the current time.
    async fn append_audit_event(&mut self, event: &NewAuditEvent) -> Result<AuditEvent, DomainError>;

    /// Events matching the query, by id ascending or descending.
    async fn list_audit_events(&mut self, query: &AuditQuery) -> Result<Vec<AuditEvent>, DomainError>;

    /// Number of events matching the query's filters, ignoring offset and limit.
    async fn count_audit_events(&mut self, query: &AuditQuery) -> Result<u64, DomainError>;
}
