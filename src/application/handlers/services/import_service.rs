//! ImportServiceHandler - Command handler for loading a service with a known id.
//!
//! Used to migrate services from earlier systems, so the id, status and
//! creation time come from the client.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::application::handlers::support::{index_service, require_valid, supplier_id_from};
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, ServiceId, ServiceStatus, Timestamp};
use crate::domain::service::{normalise, Service, ServiceData};
use crate::domain::validation::ValidationMode;
use crate::ports::{
    AuditEventRepository, FrameworkRepository, IsolationLevel, SchemaValidator, SearchIndex,
    ServiceRepository, Store, SupplierRepository,
};

const REQUIRED_KEYS: [&str; 3] = ["supplierId", "frameworkSlug", "lot"];

#[derive(Debug, Clone)]
pub struct ImportServiceCommand {
    /// Id from the request path, not yet validated.
    pub service_id: String,
    pub services: ServiceData,
}

pub struct ImportServiceHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
    search: Arc<dyn SearchIndex>,
}

impl ImportServiceHandler {
    pub fn new(
        store: Arc<dyn Store>,
        validator: Arc<dyn SchemaValidator>,
        search: Arc<dyn SearchIndex>,
    ) -> Self {
        Self { store, validator, search }
    }

    pub async fn handle(
        &self,
        cmd: ImportServiceCommand,
        metadata: CommandMetadata,
    ) -> Result<Service, ApplicationError> {
        let service_id = ServiceId::new(cmd.service_id.as_str())
            .map_err(|_| ApplicationError::bad_request("Invalid service ID supplied"))?;
        check_data_id(&service_id, &cmd.services)?;

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !cmd.services.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(ApplicationError::bad_request(format!(
                "Invalid JSON must have '{}' keys",
                missing.join("', '")
            )));
        }

        let status = match cmd.services.get("status") {
            None => ServiceStatus::Published,
            Some(value) => {
                let raw = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                raw.parse::<ServiceStatus>().map_err(|_| {
                    ApplicationError::bad_request(format!("Invalid status value '{}'", raw))
                })?
            }
        };
        let created_at = match cmd.services.get("createdAt").and_then(Value::as_str) {
            Some(raw) => Timestamp::parse_api(raw)?,
            None => Timestamp::now(),
        };
        let supplier_id = supplier_id_from(cmd.services.get("supplierId"))?;
        let framework_slug = cmd.services.get("frameworkSlug").and_then(Value::as_str).unwrap_or_default();
        let lot_slug = cmd.services.get("lot").and_then(Value::as_str).unwrap_or_default();

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let framework = tx.find_framework(framework_slug).await?.ok_or_else(|| {
            ApplicationError::bad_request(format!("Framework '{}' not found", framework_slug))
        })?;
        let lot = framework.lot(lot_slug).cloned().ok_or_else(|| {
            ApplicationError::bad_request(format!(
                "Incorrect lot '{}' for framework '{}'",
                lot_slug, framework.slug
            ))
        })?;
        let supplier = tx.find_supplier(supplier_id).await?.ok_or_else(|| {
            ApplicationError::bad_request(format!("Invalid supplier ID '{}'", supplier_id))
        })?;

        let data = normalise(cmd.services);
        let service = Service {
            service_id,
            supplier_id,
            supplier_name: supplier.name,
            framework: framework.summary(),
            lot,
            status,
            data,
            created_at,
            updated_at: created_at,
        };
        require_valid(
            self.validator.as_ref(),
            &service.schema_name(),
            &service.data,
            &ValidationMode::Full,
        )?;

        tx.insert_service(&service).await?;
        let new_archived_id = tx.archive_service(&service).await?;

        let event = NewAuditEvent::new(
            AuditType::ImportService,
            &metadata,
            json!({
                "serviceId": service.service_id,
                "supplierName": service.supplier_name,
                "supplierId": service.supplier_id,
                "oldArchivedServiceId": Value::Null,
                "newArchivedServiceId": new_archived_id,
            }),
        )
        .for_object(AuditObject::service(&service.service_id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(service_id = %service.service_id, status = %service.status, "Service imported");

        if !service.framework.status.is_expired() && service.status.is_published() {
            index_service(self.search.as_ref(), &service).await;
        }

        Ok(service)
    }
}

/// An `id` inside the data must agree with the path.
pub(crate) fn check_data_id(service_id: &ServiceId, data: &ServiceData) -> Result<(), ApplicationError> {
    match data.get("id") {
        Some(value) => {
            let matches = match value {
                Value::String(s) => s == service_id.as_str(),
                other => other.to_string() == service_id.as_str(),
            };
            if matches {
                Ok(())
            } else {
                Err(ApplicationError::bad_request("id parameter must match id in data"))
            }
        }
        None => Ok(()),
    }
}
