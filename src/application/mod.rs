//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write through a `StoreTransaction`; query handlers read
//! through one and never commit.

pub mod error;
pub mod handlers;

pub use error::ApplicationError;
