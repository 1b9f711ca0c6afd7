//! UpdateDraftHandler - Command handler for editing a draft's content.
//!
//! Runs under serializable isolation so two concurrent edits cannot both
//! merge into the same base version.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::application::handlers::support::require_valid;
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, DraftId, Timestamp};
use crate::domain::service::{DraftService, ServiceData};
use crate::ports::{
    AuditEventRepository, DraftServiceRepository, IsolationLevel, SchemaValidator, Store,
};

#[derive(Debug, Clone)]
pub struct UpdateDraftCommand {
    pub draft_id: DraftId,
    pub update: ServiceData,
    pub page_questions: Option<Vec<String>>,
}

pub struct UpdateDraftHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
}

impl UpdateDraftHandler {
    pub fn new(store: Arc<dyn Store>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { store, validator }
    }

    pub async fn handle(
        &self,
        cmd: UpdateDraftCommand,
        metadata: CommandMetadata,
    ) -> Result<DraftService, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::Serializable).await?;

        let mut draft = tx
            .find_draft(cmd.draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("Draft '{}' not found", cmd.draft_id)))?;

        draft.apply_update(&cmd.update, Timestamp::now());
        require_valid(
            self.validator.as_ref(),
            &draft.schema_name(),
            &draft.data,
            &draft.validation_mode(cmd.page_questions),
        )?;

        tx.update_draft(&draft).await?;

        let mut data = json!({"draftId": draft.id, "updateJson": Value::Object(cmd.update)});
        if let Some(service_id) = &draft.service_id {
            data["serviceId"] = json!(service_id);
        }
        let event = NewAuditEvent::new(AuditType::UpdateDraftService, &metadata, data)
            .for_object(AuditObject::draft(draft.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(draft_id = %draft.id, "Draft service updated");

        Ok(draft)
    }
}
