//! Audit log query and append handlers.

mod create_audit_event;
mod list_audit_events;

pub use create_audit_event::{CreateAuditEventCommand, CreateAuditEventHandler};
pub use list_audit_events::{ListAuditEventsHandler, ListAuditEventsQuery};
