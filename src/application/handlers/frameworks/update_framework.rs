//! UpdateFrameworkHandler - Command handler for whitelisted framework changes.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::application::handlers::support::require_valid;
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::CommandMetadata;
use crate::domain::framework::{Framework, FrameworkUpdate};
use crate::domain::validation::{SchemaName, ValidationMode};
use crate::ports::{
    AuditEventRepository, FrameworkRepository, IsolationLevel, SchemaValidator, Store,
};

#[derive(Debug, Clone)]
pub struct UpdateFrameworkCommand {
    pub slug: String,
    pub payload: Map<String, Value>,
}

pub struct UpdateFrameworkHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
}

impl UpdateFrameworkHandler {
    pub fn new(store: Arc<dyn Store>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { store, validator }
    }

    pub async fn handle(
        &self,
        cmd: UpdateFrameworkCommand,
        metadata: CommandMetadata,
    ) -> Result<Framework, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let mut framework = tx.find_framework(&cmd.slug).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("framework '{}' not found", cmd.slug))
        })?;

        let update = FrameworkUpdate::parse(&cmd.payload).map_err(ApplicationError::BadRequest)?;
        if let Some(details) = &update.framework_agreement_details {
            let details = details.as_object().ok_or_else(|| {
                ApplicationError::bad_request("frameworkAgreementDetails must be an object")
            })?;
            require_valid(
                self.validator.as_ref(),
                &SchemaName::framework_agreement_details(),
                details,
                &ValidationMode::Full,
            )?;
        }

        framework.apply(&update);
        tx.update_framework(&framework).await?;

        let event = NewAuditEvent::new(
            AuditType::FrameworkUpdate,
            &metadata,
            json!({"update": Value::Object(cmd.payload)}),
        )
        .for_object(AuditObject::framework(framework.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(framework = %framework.slug, status = %framework.status, "Framework updated");

        Ok(framework)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;
    use crate::domain::foundation::FrameworkStatus;

    async fn update(fixture: &Fixture, payload: Value) -> Result<Framework, ApplicationError> {
        UpdateFrameworkHandler::new(fixture.store.clone(), fixture.validator.clone())
            .handle(
                UpdateFrameworkCommand {
                    slug: "g-cloud-7".into(),
                    payload: payload.as_object().cloned().unwrap(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
    }

    fn agreement_details() -> Value {
        json!({
            "frameworkAgreementVersion": "v1.0",
            "frameworkRefDate": "16-Jul-2016",
            "countersignerName": "A Countersigner",
            "countersignerRole": "Category Director",
            "variations": {},
            "lotOrder": ["saas", "scs"],
            "lotDescriptions": {}
        })
    }

    #[tokio::test]
    async fn updates_status_and_clarifications() {
        let fixture = Fixture::new().await;

        let framework = update(&fixture, json!({"status": "live", "clarificationQuestionsOpen": true}))
            .await
            .unwrap();

        assert_eq!(framework.status, FrameworkStatus::Live);
        assert!(framework.clarification_questions_open);
    }

    #[tokio::test]
    async fn stores_valid_agreement_details() {
        let fixture = Fixture::new().await;

        let framework = update(&fixture, json!({"frameworkAgreementDetails": agreement_details()}))
            .await
            .unwrap();

        assert_eq!(framework.agreement_version(), Some("v1.0"));
    }

    #[tokio::test]
    async fn incomplete_agreement_details_are_invalid() {
        let fixture = Fixture::new().await;

        let err = update(&fixture, json!({"frameworkAgreementDetails": {"frameworkAgreementVersion": "v1"}}))
            .await
            .unwrap_err();

        match err {
            ApplicationError::Invalid(errors) => {
                assert_eq!(errors.field("countersignerName"), Some("answer_required"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn payload_rules() {
        let fixture = Fixture::new().await;

        let empty = update(&fixture, json!({})).await.unwrap_err();
        assert_eq!(empty.to_string(), "Framework update expects a payload");

        let unknown = update(&fixture, json!({"status": "live", "slug": "x", "name": "y"}))
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), "Invalid keys for framework update: 'name', 'slug'");
    }
}
