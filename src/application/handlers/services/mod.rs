//! Live service command and query handlers.

mod archived_services;
mod get_service;
mod import_service;
mod list_services;
mod update_service;
mod update_service_status;

pub use archived_services::{
    GetArchivedServiceHandler, GetArchivedServiceQuery, ListArchivedServicesHandler,
    ListArchivedServicesQuery,
};
pub use get_service::{GetServiceHandler, GetServiceQuery, ServiceView};
pub use import_service::{ImportServiceCommand, ImportServiceHandler};
pub use list_services::{ListServicesHandler, ListServicesQuery};
pub use update_service::{UpdateServiceCommand, UpdateServiceHandler};
pub use update_service_status::{UpdateServiceStatusCommand, UpdateServiceStatusHandler};
