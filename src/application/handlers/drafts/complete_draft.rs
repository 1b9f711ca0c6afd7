//! CompleteDraftHandler - Marks a draft as submitted once it validates in full.

use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::support::require_valid;
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, DraftId, DraftStatus, Timestamp};
use crate::domain::service::DraftService;
use crate::domain::validation::ValidationMode;
use crate::ports::{
    AuditEventRepository, DraftServiceRepository, IsolationLevel, SchemaValidator, Store,
};

#[derive(Debug, Clone)]
pub struct CompleteDraftCommand {
    pub draft_id: DraftId,
}

pub struct CompleteDraftHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
}

impl CompleteDraftHandler {
    pub fn new(store: Arc<dyn Store>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { store, validator }
    }

    pub async fn handle(
        &self,
        cmd: CompleteDraftCommand,
        metadata: CommandMetadata,
    ) -> Result<DraftService, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let mut draft = tx
            .find_draft(cmd.draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("Draft '{}' not found", cmd.draft_id)))?;

        require_valid(
            self.validator.as_ref(),
            &draft.schema_name(),
            &draft.data,
            &ValidationMode::Full,
        )?;

        draft.set_status(DraftStatus::Submitted, Timestamp::now());
        tx.update_draft(&draft).await?;

        let event = NewAuditEvent::new(
            AuditType::CompleteDraftService,
            &metadata,
            json!({"draftId": draft.id}),
        )
        .for_object(AuditObject::draft(draft.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(draft_id = %draft.id, "Draft service submitted");

        Ok(draft)
    }
}
