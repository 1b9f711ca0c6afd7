//! HTTP adapter for supplier endpoints.
//!
//! - `POST /suppliers` - Create a supplier
//! - `GET /suppliers/{id}` - Get a supplier
//! - `GET|PUT|POST /suppliers/{id}/frameworks/{slug}` - Framework interest
//! - `PUT /suppliers/{id}/frameworks/{slug}/declaration` - Selection answers

pub mod handlers;
pub mod routes;

pub use routes::supplier_routes;
