//! HTTP adapter for draft service endpoints.
//!
//! Drafts are a supplier's work in progress towards a framework
//! submission. Publishing turns one into a live service.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::draft_routes;
