//! Handlers that start a draft from existing content.
//!
//! - `CopyServiceToDraftHandler` opens a draft for editing a live service
//! - `CopyDraftHandler` duplicates a draft as a fresh submission

use std::sync::Arc;

use serde_json::json;

use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, DraftId, ServiceId};
use crate::domain::service::{DraftService, NewDraftService};
use crate::ports::{
    AuditEventRepository, DraftServiceRepository, IsolationLevel, ServiceRepository, Store,
};

/// Command to open a draft of a live service.
#[derive(Debug, Clone)]
pub struct CopyServiceToDraftCommand {
    pub service_id: ServiceId,
}

pub struct CopyServiceToDraftHandler {
    store: Arc<dyn Store>,
}

impl CopyServiceToDraftHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CopyServiceToDraftCommand,
        metadata: CommandMetadata,
    ) -> Result<DraftService, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let service = tx.find_service(&cmd.service_id).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("Service '{}' not found", cmd.service_id))
        })?;

        if tx.draft_exists_for_service(&service.service_id).await? {
            return Err(ApplicationError::bad_request(format!(
                "Draft already exists for service {}",
                service.service_id
            )));
        }

        let draft = tx.insert_draft(&NewDraftService::from_service(&service)).await?;

        let event = NewAuditEvent::new(
            AuditType::CreateDraftService,
            &metadata,
            json!({"draftId": draft.id, "serviceId": service.service_id}),
        )
        .for_object(AuditObject::draft(draft.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(draft_id = %draft.id, service_id = %service.service_id, "Draft copied from service");

        Ok(draft)
    }
}

/// Command to duplicate a draft.
#[derive(Debug, Clone)]
pub struct CopyDraftCommand {
    pub draft_id: DraftId,
}

pub struct CopyDraftHandler {
    store: Arc<dyn Store>,
}

impl CopyDraftHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CopyDraftCommand,
        metadata: CommandMetadata,
    ) -> Result<DraftService, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let original = tx
            .find_draft(cmd.draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("Draft '{}' not found", cmd.draft_id)))?;

        let copy = tx.insert_draft(&original.copy()?).await?;

        let event = NewAuditEvent::new(
            AuditType::CreateDraftService,
            &metadata,
            json!({"draftId": copy.id, "originalDraftId": original.id}),
        )
        .for_object(AuditObject::draft(copy.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(draft_id = %copy.id, original_draft_id = %original.id, "Draft copied");

        Ok(copy)
    }
}
