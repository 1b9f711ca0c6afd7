//! Query handlers for archived service snapshots.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::foundation::{ArchivedServiceId, ServiceId};
use crate::domain::service::ArchivedService;
use crate::ports::{IsolationLevel, ServiceRepository, Store};

#[derive(Debug, Clone)]
pub struct ListArchivedServicesQuery {
    pub service_id: ServiceId,
}

/// Lists every snapshot of a service, oldest first.
pub struct ListArchivedServicesHandler {
    store: Arc<dyn Store>,
}

impl ListArchivedServicesHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ListArchivedServicesQuery,
    ) -> Result<Vec<ArchivedService>, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let archived = tx.list_archived_services(&query.service_id).await?;
        if archived.is_empty() {
            return Err(ApplicationError::not_found(format!(
                "No archived services for '{}'",
                query.service_id
            )));
        }
        Ok(archived)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetArchivedServiceQuery {
    pub archived_id: ArchivedServiceId,
}

pub struct GetArchivedServiceHandler {
    store: Arc<dyn Store>,
}

impl GetArchivedServiceHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetArchivedServiceQuery,
    ) -> Result<ArchivedService, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        tx.find_archived_service(query.archived_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found(format!(
                    "Archived service '{}' not found",
                    query.archived_id
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::{Fixture, SERVICE_ID};
    use crate::domain::foundation::ServiceStatus;

    #[tokio::test]
    async fn lists_snapshots_and_fetches_one() {
        let fixture = Fixture::new().await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;
        let service_id = ServiceId::new(SERVICE_ID).unwrap();

        let archived = ListArchivedServicesHandler::new(fixture.store.clone())
            .handle(ListArchivedServicesQuery { service_id: service_id.clone() })
            .await
            .unwrap();
        assert_eq!(archived.len(), 1);

        let one = GetArchivedServiceHandler::new(fixture.store.clone())
            .handle(GetArchivedServiceQuery { archived_id: archived[0].id })
            .await
            .unwrap();
        assert_eq!(one.service.service_id, service_id);
    }

    #[tokio::test]
    async fn no_snapshots_is_not_found() {
        let fixture = Fixture::new().await;

        let err = ListArchivedServicesHandler::new(fixture.store.clone())
            .handle(ListArchivedServicesQuery { service_id: ServiceId::new(SERVICE_ID).unwrap() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));

        let err = GetArchivedServiceHandler::new(fixture.store.clone())
            .handle(GetArchivedServiceQuery { archived_id: ArchivedServiceId::new(77) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }
}
