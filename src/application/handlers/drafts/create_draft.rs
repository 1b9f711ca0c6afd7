//! CreateDraftHandler - Command handler for starting a new draft service.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::application::handlers::support::{require_valid, supplier_id_from};
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::CommandMetadata;
use crate::domain::service::{normalise, DraftService, NewDraftService, ServiceData};
use crate::domain::validation::{SchemaName, ValidationMode};
use crate::ports::{
    AuditEventRepository, DraftServiceRepository, FrameworkRepository, IsolationLevel,
    SchemaValidator, Store, SupplierRepository,
};

/// Command to create a draft.
///
/// `services` carries `frameworkSlug`, `lot` and `supplierId` alongside the
/// first answers.
#[derive(Debug, Clone)]
pub struct CreateDraftCommand {
    pub services: ServiceData,
    pub page_questions: Option<Vec<String>>,
}

/// Handler for creating drafts.
pub struct CreateDraftHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
}

impl CreateDraftHandler {
    pub fn new(store: Arc<dyn Store>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { store, validator }
    }

    pub async fn handle(
        &self,
        cmd: CreateDraftCommand,
        metadata: CommandMetadata,
    ) -> Result<DraftService, ApplicationError> {
        let framework_slug = string_field(&cmd.services, "frameworkSlug");
        let lot_slug = string_field(&cmd.services, "lot");
        let supplier_id = supplier_id_from(cmd.services.get("supplierId"))?;

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let framework = tx
            .find_framework(&framework_slug)
            .await?
            .filter(|f| f.status.accepts_submissions())
            .ok_or_else(|| {
                ApplicationError::bad_request(format!(
                    "'{}' is not open for submissions",
                    framework_slug
                ))
            })?;

        let lot = framework.lot(&lot_slug).cloned().ok_or_else(|| {
            ApplicationError::bad_request(format!(
                "Incorrect lot '{}' for framework '{}'",
                lot_slug, framework.slug
            ))
        })?;

        if tx.find_supplier(supplier_id).await?.is_none() {
            return Err(ApplicationError::bad_request(format!(
                "Invalid supplier ID '{}'",
                supplier_id
            )));
        }

        if lot.one_service_limit
            && tx.draft_exists_for_lot(supplier_id, framework.id, lot.id).await?
        {
            return Err(ApplicationError::bad_request(format!(
                "'{}' service already exists for supplier '{}'",
                lot.slug, supplier_id
            )));
        }

        let data = normalise(cmd.services.clone());
        require_valid(
            self.validator.as_ref(),
            &SchemaName::services(&framework.slug, &lot.slug),
            &data,
            &ValidationMode::for_page(cmd.page_questions),
        )?;

        let draft = tx
            .insert_draft(&NewDraftService::fresh(supplier_id, framework.id, lot.id, data))
            .await?;

        let event = NewAuditEvent::new(
            AuditType::CreateDraftService,
            &metadata,
            json!({"draftId": draft.id, "draftJson": Value::Object(cmd.services)}),
        )
        .for_object(AuditObject::draft(draft.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(
            draft_id = %draft.id,
            supplier_id = %supplier_id,
            framework = %framework.slug,
            lot = %lot.slug,
            "Draft service created"
        );

        Ok(draft)
    }
}

fn string_field(data: &ServiceData, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
