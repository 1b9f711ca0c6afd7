//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresStore` - Begins transactions on the connection pool
//! - `PostgresTransaction` - Implements every repository port on one transaction

mod agreement_repository;
mod audit_repository;
mod draft_repository;
mod framework_repository;
mod service_repository;
mod store;
mod supplier_repository;

pub use store::{PostgresStore, PostgresTransaction};
