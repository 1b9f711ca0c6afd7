//! UpdateServiceHandler - Command handler for editing a live service.

use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::support::{index_service, require_valid};
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, ServiceId, Timestamp};
use crate::domain::service::{Service, ServiceData};
use crate::domain::validation::ValidationMode;
use crate::ports::{
    AuditEventRepository, IsolationLevel, SchemaValidator, SearchIndex, ServiceRepository, Store,
};

use super::import_service::check_data_id;

#[derive(Debug, Clone)]
pub struct UpdateServiceCommand {
    pub service_id: ServiceId,
    pub update: ServiceData,
}

pub struct UpdateServiceHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
    search: Arc<dyn SearchIndex>,
}

impl UpdateServiceHandler {
    pub fn new(
        store: Arc<dyn Store>,
        validator: Arc<dyn SchemaValidator>,
        search: Arc<dyn SearchIndex>,
    ) -> Self {
        Self { store, validator, search }
    }

    pub async fn handle(
        &self,
        cmd: UpdateServiceCommand,
        metadata: CommandMetadata,
    ) -> Result<Service, ApplicationError> {
        check_data_id(&cmd.service_id, &cmd.update)?;

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let mut service = tx.find_service(&cmd.service_id).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("Service '{}' not found", cmd.service_id))
        })?;
        let old_archived_id = tx
            .list_archived_services(&service.service_id)
            .await?
            .last()
            .map(|archived| archived.id);

        service.update_data(&cmd.update, Timestamp::now());
        require_valid(
            self.validator.as_ref(),
            &service.schema_name(),
            &service.data,
            &ValidationMode::Full,
        )?;

        tx.update_service(&service).await?;
        let new_archived_id = tx.archive_service(&service).await?;

        let event = NewAuditEvent::new(
            AuditType::UpdateService,
            &metadata,
            json!({
                "serviceId": service.service_id,
                "supplierName": service.supplier_name,
                "supplierId": service.supplier_id,
                "oldArchivedServiceId": old_archived_id,
                "newArchivedServiceId": new_archived_id,
            }),
        )
        .for_object(AuditObject::service(&service.service_id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(service_id = %service.service_id, "Service updated");

        if service.is_searchable() {
            index_service(self.search.as_ref(), &service).await;
        }

        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::{object, Fixture, SERVICE_ID};
    use crate::domain::audit::AuditQuery;
    use crate::domain::foundation::{FrameworkStatus, ServiceStatus};

    fn handler(fixture: &Fixture) -> UpdateServiceHandler {
        UpdateServiceHandler::new(fixture.store.clone(), fixture.validator.clone(), fixture.search.clone())
    }

    fn service_id() -> ServiceId {
        ServiceId::new(SERVICE_ID).unwrap()
    }

    #[tokio::test]
    async fn merges_update_archives_and_links_versions() {
        let fixture = Fixture::new().await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;

        let service = handler(&fixture)
            .handle(
                UpdateServiceCommand {
                    service_id: service_id(),
                    update: object(json!({"serviceName": "  new name ", "supplierName": "ignored"})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert_eq!(service.name(), "new name");
        assert_eq!(service.supplier_name, "Supplier 1");

        let mut tx = fixture.store.begin(IsolationLevel::ReadCommitted).await.unwrap();
        let events = tx
            .list_audit_events(&AuditQuery::latest(
                AuditType::UpdateService,
                AuditObject::service(&service_id()),
            ))
            .await
            .unwrap();
        let data = &events[0].data;
        assert_eq!(
            data["oldArchivedServiceId"].as_i64().unwrap() + 1,
            data["newArchivedServiceId"].as_i64().unwrap()
        );
        assert_eq!(data["supplierName"], "Supplier 1");
        assert_eq!(data["supplierId"], 1);
    }

    #[tokio::test]
    async fn invalid_update_is_rejected_in_full() {
        let fixture = Fixture::new().await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;

        let err = handler(&fixture)
            .handle(
                UpdateServiceCommand {
                    service_id: service_id(),
                    update: object(json!({"priceUnit": "Bad"})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        match err {
            ApplicationError::Invalid(errors) => {
                assert_eq!(errors.field("priceUnit"), Some("no_unit_specified"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn mismatched_data_id_is_rejected() {
        let fixture = Fixture::new().await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;

        let err = handler(&fixture)
            .handle(
                UpdateServiceCommand {
                    service_id: service_id(),
                    update: object(json!({"id": "2469135780246912", "foo": "bar"})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "id parameter must match id in data");
    }

    #[tokio::test]
    async fn indexes_when_live_and_published() {
        let fixture = Fixture::with_g7_status(FrameworkStatus::Live).await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;

        handler(&fixture)
            .handle(
                UpdateServiceCommand {
                    service_id: service_id(),
                    update: object(json!({"serviceName": "new name"})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert_eq!(fixture.search.indexed_ids(), vec![service_id()]);
    }

    #[tokio::test]
    async fn missing_service_is_not_found() {
        let fixture = Fixture::new().await;

        let err = handler(&fixture)
            .handle(
                UpdateServiceCommand { service_id: service_id(), update: ServiceData::new() },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound(_)));
    }
}
