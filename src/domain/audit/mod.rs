//! Append-only audit log.

mod audit_event;
mod audit_type;

pub use audit_event::{AuditEvent, AuditObject, AuditObjectType, AuditQuery, NewAuditEvent};
pub use audit_type::AuditType;
