//! GetDraftHandler - Query handler for a draft with its review state.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::audit::{AuditEvent, AuditObject, AuditQuery};
use crate::domain::foundation::DraftId;
use crate::domain::service::DraftService;
use crate::domain::validation::{ValidationErrors, ValidationMode};
use crate::ports::{
    AuditEventRepository, DraftServiceRepository, IsolationLevel, SchemaValidator, Store,
};

#[derive(Debug, Clone)]
pub struct GetDraftQuery {
    pub draft_id: DraftId,
}

/// A draft, its most recent audit event and what is still missing for submission.
#[derive(Debug, Clone)]
pub struct DraftView {
    pub draft: DraftService,
    pub latest_audit_event: Option<AuditEvent>,
    pub validation_errors: ValidationErrors,
}

pub struct GetDraftHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
}

impl GetDraftHandler {
    pub fn new(store: Arc<dyn Store>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { store, validator }
    }

    pub async fn handle(&self, query: GetDraftQuery) -> Result<DraftView, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let draft = tx
            .find_draft(query.draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("Draft '{}' not found", query.draft_id)))?;

        let latest_audit_event = tx
            .list_audit_events(&AuditQuery::latest_for(AuditObject::draft(draft.id)))
            .await?
            .into_iter()
            .next();
        drop(tx);

        let validation_errors =
            self.validator
                .validate(&draft.schema_name(), &draft.data, &ValidationMode::Full)?;

        Ok(DraftView {
            draft,
            latest_audit_event,
            validation_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::drafts::{
        CreateDraftCommand, CreateDraftHandler, UpdateDraftCommand, UpdateDraftHandler,
    };
    use crate::application::handlers::fixtures::{object, Fixture};
    use crate::domain::audit::AuditType;
    use crate::domain::foundation::CommandMetadata;
    use serde_json::json;

    #[tokio::test]
    async fn returns_latest_event_and_missing_answers() {
        let fixture = Fixture::new().await;
        let draft = CreateDraftHandler::new(fixture.store.clone(), fixture.validator.clone())
            .handle(
                CreateDraftCommand {
                    services: object(json!({"frameworkSlug": "g-cloud-7", "lot": "scs", "supplierId": 1})),
                    page_questions: None,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        UpdateDraftHandler::new(fixture.store.clone(), fixture.validator.clone())
            .handle(
                UpdateDraftCommand {
                    draft_id: draft.id,
                    update: object(json!({"serviceName": "Named"})),
                    page_questions: None,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        let view = GetDraftHandler::new(fixture.store.clone(), fixture.validator.clone())
            .handle(GetDraftQuery { draft_id: draft.id })
            .await
            .unwrap();

        assert_eq!(view.draft.data["serviceName"], "Named");
        assert_eq!(
            view.latest_audit_event.map(|e| e.audit_type),
            Some(AuditType::UpdateDraftService)
        );
        assert_eq!(view.validation_errors.field("serviceSummary"), Some("answer_required"));
        assert!(!view.validation_errors.has_field("serviceName"));
    }

    #[tokio::test]
    async fn missing_draft_is_not_found() {
        let fixture = Fixture::new().await;

        let err = GetDraftHandler::new(fixture.store.clone(), fixture.validator.clone())
            .handle(GetDraftQuery { draft_id: DraftId::new(5) })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound(_)));
    }
}
