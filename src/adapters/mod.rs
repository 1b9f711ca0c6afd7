//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - The production store
//! - `memory` - An in-memory store with the same transaction semantics
//! - `validation` - JSON schema validation of service content
//! - `search` - Search index clients
//! - `ids` - Service id generators
//! - `http` - The REST API

pub mod http;
pub mod ids;
pub mod memory;
pub mod postgres;
pub mod search;
pub mod validation;
