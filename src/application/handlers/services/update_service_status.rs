//! UpdateServiceStatusHandler - Publishes, enables or disables a live service.

use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::support::{index_service, unindex_service};
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, ServiceId, ServiceStatus, Timestamp};
use crate::domain::service::Service;
use crate::ports::{AuditEventRepository, IsolationLevel, SearchIndex, ServiceRepository, Store};

/// `status` is the raw path segment; it is parsed by the handler.
#[derive(Debug, Clone)]
pub struct UpdateServiceStatusCommand {
    pub service_id: ServiceId,
    pub status: String,
}

pub struct UpdateServiceStatusHandler {
    store: Arc<dyn Store>,
    search: Arc<dyn SearchIndex>,
}

impl UpdateServiceStatusHandler {
    pub fn new(store: Arc<dyn Store>, search: Arc<dyn SearchIndex>) -> Self {
        Self { store, search }
    }

    pub async fn handle(
        &self,
        cmd: UpdateServiceStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<Service, ApplicationError> {
        let status: ServiceStatus = cmd.status.parse().map_err(|_| {
            ApplicationError::bad_request(format!(
                "'{}' is not a valid status. Valid statuses are: {}",
                cmd.status,
                ServiceStatus::valid_values()
            ))
        })?;

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let mut service = tx.find_service(&cmd.service_id).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("Service '{}' not found", cmd.service_id))
        })?;
        if service.status == status {
            return Ok(service);
        }

        let old_archived_id = tx
            .list_archived_services(&service.service_id)
            .await?
            .last()
            .map(|archived| archived.id);
        let old_status = service.set_status(status, Timestamp::now());
        tx.update_service(&service).await?;
        let new_archived_id = tx.archive_service(&service).await?;

        let event = NewAuditEvent::new(
            AuditType::UpdateServiceStatus,
            &metadata,
            json!({
                "serviceId": service.service_id,
                "supplierName": service.supplier_name,
                "supplierId": service.supplier_id,
                "new_status": status,
                "old_status": old_status,
                "oldArchivedServiceId": old_archived_id,
                "newArchivedServiceId": new_archived_id,
            }),
        )
        .for_object(AuditObject::service(&service.service_id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(
            service_id = %service.service_id,
            old_status = %old_status,
            new_status = %status,
            "Service status updated"
        );

        if old_status.is_published() {
            unindex_service(self.search.as_ref(), &service.service_id).await;
        } else if service.is_searchable() {
            index_service(self.search.as_ref(), &service).await;
        }

        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::search::SearchCall;
    use crate::application::handlers::fixtures::{Fixture, SERVICE_ID};
    use crate::domain::foundation::FrameworkStatus;

    fn handler(fixture: &Fixture) -> UpdateServiceStatusHandler {
        UpdateServiceStatusHandler::new(fixture.store.clone(), fixture.search.clone())
    }

    fn command(status: &str) -> UpdateServiceStatusCommand {
        UpdateServiceStatusCommand {
            service_id: ServiceId::new(SERVICE_ID).unwrap(),
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn invalid_status_lists_valid_ones() {
        let fixture = Fixture::new().await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;

        let err = handler(&fixture)
            .handle(command("foo"), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "'foo' is not a valid status. Valid statuses are: disabled, enabled, published"
        );
    }

    #[tokio::test]
    async fn unchanged_status_writes_nothing() {
        let fixture = Fixture::new().await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;
        let before = fixture.store.audit_event_count().await;

        handler(&fixture)
            .handle(command("published"), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(fixture.store.audit_event_count().await, before);
        assert!(fixture.search.calls().is_empty());
    }

    #[tokio::test]
    async fn unpublishing_removes_from_index() {
        let fixture = Fixture::with_g7_status(FrameworkStatus::Live).await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;

        let service = handler(&fixture)
            .handle(command("disabled"), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(service.status, ServiceStatus::Disabled);
        assert_eq!(fixture.search.deleted_ids(), vec![service.service_id]);
    }

    #[tokio::test]
    async fn publishing_on_live_framework_indexes_current_document() {
        let fixture = Fixture::with_g7_status(FrameworkStatus::Live).await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Enabled).await;

        let service = handler(&fixture)
            .handle(command("published"), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(
            fixture.search.calls(),
            vec![SearchCall::Index {
                id: service.service_id.clone(),
                document: service.to_document(),
            }]
        );
    }

    #[tokio::test]
    async fn enabling_a_disabled_service_leaves_index_alone() {
        let fixture = Fixture::with_g7_status(FrameworkStatus::Live).await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Disabled).await;

        handler(&fixture)
            .handle(command("enabled"), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert!(fixture.search.calls().is_empty());
    }
}
