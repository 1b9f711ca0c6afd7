//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `Store` - Begins transactions at a given isolation level
//! - `StoreTransaction` - Unit of work exposing every repository below
//! - `FrameworkRepository`, `SupplierRepository`, `AgreementRepository`,
//!   `ServiceRepository`, `DraftServiceRepository`, `AuditEventRepository`
//!
//! ## Collaborator Ports
//!
//! - `SchemaValidator` - JSON schema validation of documents
//! - `SearchIndex` - External search service
//! - `ServiceIdGenerator` - Ids for newly published services

mod agreement_repository;
mod audit_repository;
mod draft_repository;
mod framework_repository;
mod schema_validator;
mod search_index;
mod service_id_generator;
mod service_repository;
mod store;
mod supplier_repository;

pub use agreement_repository::AgreementRepository;
pub use audit_repository::AuditEventRepository;
pub use draft_repository::{DraftQuery, DraftServiceRepository};
pub use framework_repository::FrameworkRepository;
pub use schema_validator::SchemaValidator;
pub use search_index::SearchIndex;
pub use service_id_generator::ServiceIdGenerator;
pub use service_repository::ServiceRepository;
pub use store::{IsolationLevel, Page, Store, StoreTransaction};
pub use supplier_repository::SupplierRepository;
