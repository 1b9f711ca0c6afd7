use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::frameworks::find_framework;
use crate::application::ApplicationError;
use crate::domain::agreement::{FrameworkAgreement, NewFrameworkAgreement};
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{AgreementId, CommandMetadata, SupplierId};
use crate::ports::{
    AgreementRepository, AuditEventRepository, IsolationLevel, Store, SupplierRepository,
};

#[derive(Debug, Clone)]
pub struct CreateAgreementCommand {
    pub supplier_id: SupplierId,
    pub framework_slug: String,
}

pub struct CreateAgreementHandler {
    store: Arc<dyn Store>,
}

impl CreateAgreementHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CreateAgreementCommand,
        metadata: CommandMetadata,
    ) -> Result<FrameworkAgreement, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let framework = find_framework(tx.as_mut(), &cmd.framework_slug).await?;
        let registration = tx
            .find_supplier_framework(cmd.supplier_id, framework.id)
            .await?
            .filter(|sf| sf.is_on_framework())
            .ok_or_else(|| {
                ApplicationError::not_found(format!(
                    "supplier_id '{}' is not on framework '{}'",
                    cmd.supplier_id, framework.slug
                ))
            })?;
        if registration.agreement.is_some() {
            return Err(ApplicationError::bad_request(format!(
                "supplier_id '{}' already has a framework agreement for framework '{}'",
                cmd.supplier_id, framework.slug
            )));
        }

        let agreement = tx
            .insert_agreement(&NewFrameworkAgreement {
                supplier_id: cmd.supplier_id,
                framework_id: framework.id,
            })
            .await?;

        let event = NewAuditEvent::new(
            AuditType::CreateAgreement,
            &metadata,
            json!({"supplierId": agreement.supplier_id, "frameworkSlug": framework.slug}),
        )
        .for_object(AuditObject::agreement(agreement.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(
            agreement_id = %agreement.id,
            supplier_id = %agreement.supplier_id,
            framework = %framework.slug,
            "Framework agreement created"
        );

        Ok(agreement)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetAgreementQuery {
    pub agreement_id: AgreementId,
}

pub struct GetAgreementHandler {
    store: Arc<dyn Store>,
}

impl GetAgreementHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetAgreementQuery) -> Result<FrameworkAgreement, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        tx.find_agreement(query.agreement_id).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("agreement_id '{}' not found", query.agreement_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;
    use crate::application::handlers::suppliers::{RegisterInterestCommand, RegisterInterestHandler};

    fn command() -> CreateAgreementCommand {
        CreateAgreementCommand { supplier_id: SupplierId::new(1), framework_slug: "g-cloud-7".into() }
    }

    async fn registered(on_framework: bool) -> Fixture {
        let fixture = Fixture::new().await;
        RegisterInterestHandler::new(fixture.store.clone())
            .handle(
                RegisterInterestCommand { supplier_id: SupplierId::new(1), framework_slug: "g-cloud-7".into() },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        if on_framework {
            fixture.set_on_framework(1).await;
        }
        fixture
    }

    #[tokio::test]
    async fn creates_draft_agreement() {
        let fixture = registered(true).await;

        let agreement = CreateAgreementHandler::new(fixture.store.clone())
            .handle(command(), CommandMetadata::test_fixture())
            .await
            .unwrap();
        let fetched = GetAgreementHandler::new(fixture.store.clone())
            .handle(GetAgreementQuery { agreement_id: agreement.id })
            .await
            .unwrap();

        assert_eq!(fetched.to_document()["status"], "draft");
        assert_eq!(fetched.framework_slug, "g-cloud-7");
    }

    #[tokio::test]
    async fn supplier_must_be_on_framework() {
        let fixture = registered(false).await;

        let err = CreateAgreementHandler::new(fixture.store.clone())
            .handle(command(), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "supplier_id '1' is not on framework 'g-cloud-7'");
    }

    #[tokio::test]
    async fn second_agreement_is_rejected() {
        let fixture = registered(true).await;
        let handler = CreateAgreementHandler::new(fixture.store.clone());
        handler.handle(command(), CommandMetadata::test_fixture()).await.unwrap();

        let err = handler.handle(command(), CommandMetadata::test_fixture()).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "supplier_id '1' already has a framework agreement for framework 'g-cloud-7'"
        );
    }

    #[tokio::test]
    async fn missing_agreement_is_not_found() {
        let fixture = Fixture::new().await;

        let err = GetAgreementHandler::new(fixture.store.clone())
            .handle(GetAgreementQuery { agreement_id: AgreementId::new(99) })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound(_)));
    }
}
