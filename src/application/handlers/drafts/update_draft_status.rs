//! UpdateDraftStatusHandler - Sets a draft's status directly.

use std::sync::Arc;

use serde_json::json;

use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, DraftId, DraftStatus, Timestamp};
use crate::domain::service::DraftService;
use crate::ports::{AuditEventRepository, DraftServiceRepository, IsolationLevel, Store};

/// `status` is the raw client value; it is parsed by the handler.
#[derive(Debug, Clone)]
pub struct UpdateDraftStatusCommand {
    pub draft_id: DraftId,
    pub status: String,
}

pub struct UpdateDraftStatusHandler {
    store: Arc<dyn Store>,
}

impl UpdateDraftStatusHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: UpdateDraftStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<DraftService, ApplicationError> {
        let status: DraftStatus = cmd.status.parse()?;

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let mut draft = tx
            .find_draft(cmd.draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("Draft '{}' not found", cmd.draft_id)))?;

        draft.set_status(status, Timestamp::now());
        tx.update_draft(&draft).await?;

        let event = NewAuditEvent::new(
            AuditType::UpdateDraftServiceStatus,
            &metadata,
            json!({"draftId": draft.id, "status": status}),
        )
        .for_object(AuditObject::draft(draft.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(draft_id = %draft.id, status = %status, "Draft status updated");

        Ok(draft)
    }
}
