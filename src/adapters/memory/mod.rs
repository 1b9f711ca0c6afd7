//! In-memory store adapter.
//!
//! Same transactional semantics as the PostgreSQL store. Useful for tests
//! and local development.

mod store;

pub use store::{seeded_lots, InMemoryStore};
