//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Every
//! command runs in one store transaction together with its audit event.

pub mod agreements;
pub mod audit;
pub mod drafts;
pub mod frameworks;
pub mod paging;
pub mod services;
pub mod suppliers;

mod support;

#[cfg(test)]
pub(crate) mod fixtures;

pub use paging::{PageRequest, Paginated};
