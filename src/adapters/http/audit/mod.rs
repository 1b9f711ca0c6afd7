//! HTTP adapter for the audit log.
//!
//! - `GET /audit-events` - Filtered, paginated listing
//! - `POST /audit-events` - Record a free-standing event

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::audit_routes;
