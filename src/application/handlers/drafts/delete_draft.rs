//! DeleteDraftHandler - Removes a draft.

use std::sync::Arc;

use serde_json::json;

use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, DraftId};
use crate::ports::{AuditEventRepository, DraftServiceRepository, IsolationLevel, Store};

#[derive(Debug, Clone)]
pub struct DeleteDraftCommand {
    pub draft_id: DraftId,
}

pub struct DeleteDraftHandler {
    store: Arc<dyn Store>,
}

impl DeleteDraftHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: DeleteDraftCommand,
        metadata: CommandMetadata,
    ) -> Result<(), ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let draft = tx
            .find_draft(cmd.draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("Draft '{}' not found", cmd.draft_id)))?;

        let mut data = json!({"draftId": draft.id});
        if let Some(service_id) = &draft.service_id {
            data["serviceId"] = json!(service_id);
        }
        let event = NewAuditEvent::new(AuditType::DeleteDraftService, &metadata, data)
            .for_object(AuditObject::draft(draft.id));
        tx.append_audit_event(&event).await?;
        tx.delete_draft(draft.id).await?;
        tx.commit().await?;

        tracing::info!(draft_id = %draft.id, "Draft service deleted");

        Ok(())
    }
}
