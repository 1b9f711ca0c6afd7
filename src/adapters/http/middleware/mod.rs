//! HTTP middleware for axum.
//!
//! - `auth` - Bearer token check in front of every API route

pub mod auth;

pub use auth::{auth_middleware, AuthState};
