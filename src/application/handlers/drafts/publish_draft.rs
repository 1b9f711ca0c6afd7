//! PublishDraftHandler - Turns a draft into a live service.
//!
//! Publishing runs in one transaction that writes the service, its archive
//! snapshot, the draft change and the audit event together. The search index
//! is only told about the service after that transaction commits.

use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::support::index_service;
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{
    CommandMetadata, DomainError, DraftId, DraftStatus, ErrorCode, ServiceId, Timestamp,
};
use crate::domain::service::Service;
use crate::ports::{
    AuditEventRepository, DraftServiceRepository, IsolationLevel, SearchIndex,
    ServiceIdGenerator, ServiceRepository, Store, StoreTransaction,
};

/// Attempts at finding an unused generated service id.
const MAX_ID_ATTEMPTS: usize = 10;

#[derive(Debug, Clone)]
pub struct PublishDraftCommand {
    pub draft_id: DraftId,
}

pub struct PublishDraftHandler {
    store: Arc<dyn Store>,
    search: Arc<dyn SearchIndex>,
    ids: Arc<dyn ServiceIdGenerator>,
}

impl PublishDraftHandler {
    pub fn new(
        store: Arc<dyn Store>,
        search: Arc<dyn SearchIndex>,
        ids: Arc<dyn ServiceIdGenerator>,
    ) -> Self {
        Self { store, search, ids }
    }

    pub async fn handle(
        &self,
        cmd: PublishDraftCommand,
        metadata: CommandMetadata,
    ) -> Result<Service, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let mut draft = tx
            .find_draft(cmd.draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("Draft '{}' not found", cmd.draft_id)))?;
        draft.ensure_publishable()?;

        let now = Timestamp::now();
        let (service, old_archived_id) = match draft.service_id.clone() {
            Some(service_id) => {
                let mut service = tx.find_service(&service_id).await?.ok_or_else(|| {
                    ApplicationError::not_found(format!("Service '{}' not found", service_id))
                })?;
                let old_archived_id = tx
                    .list_archived_services(&service_id)
                    .await?
                    .last()
                    .map(|archived| archived.id);

                service.replace_data(draft.data.clone(), now);
                tx.update_service(&service).await?;
                tx.delete_draft(draft.id).await?;
                (service, old_archived_id)
            }
            None => {
                let service_id = self.unused_service_id(tx.as_mut()).await?;
                let service = Service::from_draft(service_id, &draft, now);
                tx.insert_service(&service).await?;

                draft.set_status(DraftStatus::Published, now);
                tx.update_draft(&draft).await?;
                (service, None)
            }
        };
        let new_archived_id = tx.archive_service(&service).await?;

        let event = NewAuditEvent::new(
            AuditType::PublishDraftService,
            &metadata,
            json!({
                "draftId": draft.id,
                "serviceId": service.service_id,
                "oldArchivedServiceId": old_archived_id,
                "newArchivedServiceId": new_archived_id,
            }),
        )
        .for_object(AuditObject::draft(draft.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(
            draft_id = %draft.id,
            service_id = %service.service_id,
            "Draft service published"
        );

        if service.is_searchable() {
            index_service(self.search.as_ref(), &service).await;
        }

        Ok(service)
    }

    async fn unused_service_id(
        &self,
        tx: &mut dyn StoreTransaction,
    ) -> Result<ServiceId, DomainError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.generate()?;
            if !tx.service_exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(service_id = %candidate, "Generated service id already taken");
        }
        Err(DomainError::new(
            ErrorCode::InternalError,
            "Could not generate an unused service id",
        ))
    }
}
