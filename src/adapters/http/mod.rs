//! HTTP adapters - REST API implementations.
//!
//! Each resource has its own module with `handlers` and `routes`, plus a
//! `dto` module where the resource takes query parameters or structured
//! bodies. `api_router` assembles them.

pub mod agreements;
pub mod audit;
pub mod drafts;
pub mod error;
pub mod extract;
pub mod frameworks;
pub mod middleware;
pub mod router;
pub mod services;
pub mod state;
pub mod suppliers;

pub use error::ApiError;
pub use middleware::AuthState;
pub use router::api_router;
pub use state::AppState;
