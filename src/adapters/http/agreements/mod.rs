//! HTTP adapter for framework agreement endpoints.
//!
//! - `POST /agreements` - Create an agreement for a supplier on a framework
//! - `GET /agreements/{id}` - Get an agreement
//! - `POST /agreements/{id}` - Update signed details or path
//! - `POST /agreements/{id}/sign` - Mark the agreement returned
//! - `POST /agreements/{id}/countersign` - Mark the agreement countersigned

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::agreement_routes;
