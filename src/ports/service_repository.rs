//! Service repository port.
//!
//! Live services and their archived snapshots. Archiving is append-only:
//! a snapshot is inserted after every change to a live service and is never
//! modified afterwards.

use async_trait::async_trait;

use crate::domain::foundation::{ArchivedServiceId, DomainError, ServiceId};
use crate::domain::service::{ArchivedService, Service, ServiceFilter};

use super::Page;

#[async_trait]
pub trait ServiceRepository: Send {
    async fn find_service(&mut self, id: &ServiceId) -> Result<Option<Service>, DomainError>;

    async fn service_exists(&mut self, id: &ServiceId) -> Result<bool, DomainError>;

    /// # Errors
    ///
    /// - `AlreadyExists` if the service id is taken
    async fn insert_service(&mut self, service: &Service) -> Result<(), DomainError>;

    /// Writes status, data and `updated_at`.
    ///
    /// # Errors
    ///
    /// - `ServiceNotFound` if the service doesn't exist
    async fn update_service(&mut self, service: &Service) -> Result<(), DomainError>;

    /// Services matching the filter in `filter.order()` order.
    ///
    /// `None` returns every match.
    async fn list_services(
        &mut self,
        filter: &ServiceFilter,
        page: Option<Page>,
    ) -> Result<Vec<Service>, DomainError>;

    /// Number of services matching the filter, ignoring paging.
    async fn count_services(&mut self, filter: &ServiceFilter) -> Result<u64, DomainError>;

    /// Stores a snapshot of the service as it is now.
    async fn archive_service(&mut self, service: &Service) -> Result<ArchivedServiceId, DomainError>;

    async fn find_archived_service(
        &mut self,
        id: ArchivedServiceId,
    ) -> Result<Option<ArchivedService>, DomainError>;

    /// Snapshots of a service, oldest first.
    async fn list_archived_services(
        &mut self,
        service_id: &ServiceId,
    ) -> Result<Vec<ArchivedService>, DomainError>;
}
