//! GetServiceHandler - Query handler for one live service.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::audit::{AuditEvent, AuditObject, AuditQuery, AuditType};
use crate::domain::foundation::ServiceId;
use crate::domain::service::Service;
use crate::ports::{AuditEventRepository, IsolationLevel, ServiceRepository, Store};

#[derive(Debug, Clone)]
pub struct GetServiceQuery {
    pub service_id: ServiceId,
}

/// A service and, when it is not available to buyers, the event that made it so.
#[derive(Debug, Clone)]
pub struct ServiceView {
    pub service: Service,
    pub made_unavailable_by: Option<AuditEvent>,
}

pub struct GetServiceHandler {
    store: Arc<dyn Store>,
}

impl GetServiceHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetServiceQuery) -> Result<ServiceView, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let service = tx.find_service(&query.service_id).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("Service '{}' not found", query.service_id))
        })?;

        let unavailable_query = if service.framework.status.is_expired() {
            Some(AuditQuery::latest(
                AuditType::FrameworkUpdate,
                AuditObject::framework(service.framework.id),
            ))
        } else if !service.status.is_published() {
            Some(AuditQuery::latest(
                AuditType::UpdateServiceStatus,
                AuditObject::service(&service.service_id),
            ))
        } else {
            None
        };

        let made_unavailable_by = match unavailable_query {
            Some(q) => tx.list_audit_events(&q).await?.into_iter().next(),
            None => None,
        };

        Ok(ServiceView {
            service,
            made_unavailable_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::{Fixture, SERVICE_ID};
    use crate::application::handlers::services::{
        UpdateServiceStatusCommand, UpdateServiceStatusHandler,
    };
    use crate::domain::foundation::{CommandMetadata, FrameworkStatus, ServiceStatus};

    fn query() -> GetServiceQuery {
        GetServiceQuery { service_id: ServiceId::new(SERVICE_ID).unwrap() }
    }

    #[tokio::test]
    async fn published_service_has_no_unavailable_event() {
        let fixture = Fixture::with_g7_status(FrameworkStatus::Live).await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;

        let view = GetServiceHandler::new(fixture.store.clone()).handle(query()).await.unwrap();

        assert_eq!(view.service.status, ServiceStatus::Published);
        assert!(view.made_unavailable_by.is_none());
    }

    #[tokio::test]
    async fn disabled_service_reports_status_change() {
        let fixture = Fixture::with_g7_status(FrameworkStatus::Live).await;
        fixture.add_service(SERVICE_ID, ServiceStatus::Published).await;
        UpdateServiceStatusHandler::new(fixture.store.clone(), fixture.search.clone())
            .handle(
                UpdateServiceStatusCommand {
                    service_id: ServiceId::new(SERVICE_ID).unwrap(),
                    status: "disabled".into(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        let view = GetServiceHandler::new(fixture.store.clone()).handle(query()).await.unwrap();

        let event = view.made_unavailable_by.unwrap();
        assert_eq!(event.audit_type, AuditType::UpdateServiceStatus);
        assert_eq!(event.data["new_status"], "disabled");
    }

    #[tokio::test]
    async fn missing_service_is_not_found() {
        let fixture = Fixture::new().await;

        let err = GetServiceHandler::new(fixture.store.clone()).handle(query()).await.unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound(_)));
    }
}
