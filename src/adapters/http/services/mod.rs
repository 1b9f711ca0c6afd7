//! HTTP adapter for live and archived service endpoints.
//!
//! - `GET /services` - Browse live services
//! - `GET|PUT|POST /services/{id}` - Get, import or update a service
//! - `POST /services/{id}/status/{status}` - Change publication status
//! - `GET /archived-services` - Snapshots of one service
//! - `GET /archived-services/{id}` - One snapshot

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::service_routes;
