//! HTTP adapter for framework endpoints.
//!
//! - `GET /frameworks` - List frameworks
//! - `POST /frameworks` - Create a framework
//! - `GET /frameworks/{slug}` - Get a framework
//! - `POST /frameworks/{slug}` - Update whitelisted framework fields
//! - `GET /frameworks/{slug}/stats` - Submission statistics
//! - `GET /frameworks/{slug}/suppliers` - Supplier registrations and agreements
//! - `GET /frameworks/{slug}/interest` - Ids of interested suppliers

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::framework_routes;
