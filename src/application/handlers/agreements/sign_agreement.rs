//! Signing workflow for framework agreements.
//!
//! Updates, signatures and countersignatures each run in one transaction
//! with their audit event.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::application::handlers::frameworks::find_framework;
use crate::application::handlers::support::require_valid;
use crate::application::ApplicationError;
use crate::domain::agreement::FrameworkAgreement;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{AgreementId, CommandMetadata, Timestamp, UserId};
use crate::domain::validation::{SchemaName, ValidationMode};
use crate::ports::{
    AgreementRepository, AuditEventRepository, IsolationLevel, SchemaValidator, Store,
    StoreTransaction, SupplierRepository,
};

const UPDATE_KEYS: [&str; 2] = ["signedAgreementDetails", "signedAgreementPath"];

async fn find_agreement(
    tx: &mut dyn StoreTransaction,
    id: AgreementId,
) -> Result<FrameworkAgreement, ApplicationError> {
    tx.find_agreement(id)
        .await?
        .ok_or_else(|| ApplicationError::not_found(format!("agreement_id '{}' not found", id)))
}

fn details_object(value: &Value, key: &str) -> Result<Map<String, Value>, ApplicationError> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| ApplicationError::bad_request(format!("'{}' must be an object", key)))
}

async fn append_event(
    tx: &mut dyn StoreTransaction,
    audit_type: AuditType,
    metadata: &CommandMetadata,
    agreement: &FrameworkAgreement,
    update: Option<Value>,
) -> Result<(), ApplicationError> {
    let mut data = json!({
        "supplierId": agreement.supplier_id,
        "frameworkSlug": agreement.framework_slug,
    });
    if let (Some(update), Some(map)) = (update, data.as_object_mut()) {
        map.insert("update".into(), update);
    }
    let event = NewAuditEvent::new(audit_type, metadata, data)
        .for_object(AuditObject::agreement(agreement.id));
    tx.append_audit_event(&event).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct UpdateAgreementCommand {
    pub agreement_id: AgreementId,
    /// The `agreement` object from the request.
    pub update: Map<String, Value>,
}

pub struct UpdateAgreementHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
}

impl UpdateAgreementHandler {
    pub fn new(store: Arc<dyn Store>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { store, validator }
    }

    pub async fn handle(
        &self,
        cmd: UpdateAgreementCommand,
        metadata: CommandMetadata,
    ) -> Result<FrameworkAgreement, ApplicationError> {
        let invalid: Vec<&str> = cmd
            .update
            .keys()
            .map(String::as_str)
            .filter(|k| !UPDATE_KEYS.contains(k))
            .collect();
        if !invalid.is_empty() {
            return Err(ApplicationError::bad_request(format!(
                "Invalid JSON should not have '{}' keys",
                invalid.join("', '")
            )));
        }

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let mut agreement = find_agreement(tx.as_mut(), cmd.agreement_id).await?;

        if let Some(details) = cmd.update.get("signedAgreementDetails") {
            let details = details_object(details, "signedAgreementDetails")?;
            let framework = find_framework(tx.as_mut(), &agreement.framework_slug).await?;
            if framework.agreement_version().is_none() {
                return Err(ApplicationError::bad_request(
                    "Can not update signedAgreementDetails for a framework agreement without a frameworkAgreementVersion",
                ));
            }
            agreement.merge_signed_details(&details);
            let merged = agreement.signed_agreement_details.clone().unwrap_or_default();
            require_valid(
                self.validator.as_ref(),
                &SchemaName::agreement_details(),
                &merged,
                &ValidationMode::lenient(),
            )?;
        }
        match cmd.update.get("signedAgreementPath") {
            Some(Value::String(path)) => agreement.signed_agreement_path = Some(path.clone()),
            Some(Value::Null) => agreement.signed_agreement_path = None,
            Some(_) => {
                return Err(ApplicationError::bad_request("'signedAgreementPath' must be a string"))
            }
            None => {}
        }

        tx.update_agreement(&agreement).await?;
        append_event(
            tx.as_mut(),
            AuditType::UpdateAgreement,
            &metadata,
            &agreement,
            Some(Value::Object(cmd.update)),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(agreement_id = %agreement.id, "Framework agreement updated");

        Ok(agreement)
    }
}

#[derive(Debug, Clone)]
pub struct SignAgreementCommand {
    pub agreement_id: AgreementId,
    pub signed_agreement_details: Option<Map<String, Value>>,
}

pub struct SignAgreementHandler {
    store: Arc<dyn Store>,
    validator: Arc<dyn SchemaValidator>,
}

impl SignAgreementHandler {
    pub fn new(store: Arc<dyn Store>, validator: Arc<dyn SchemaValidator>) -> Self {
        Self { store, validator }
    }

    pub async fn handle(
        &self,
        cmd: SignAgreementCommand,
        metadata: CommandMetadata,
    ) -> Result<FrameworkAgreement, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let mut agreement = find_agreement(tx.as_mut(), cmd.agreement_id).await?;
        let framework = find_framework(tx.as_mut(), &agreement.framework_slug).await?;

        let mut update = None;
        if let Some(version) = framework.agreement_version() {
            let details = cmd.signed_agreement_details.ok_or_else(|| {
                ApplicationError::bad_request(
                    "Invalid JSON must have 'signedAgreementDetails' key",
                )
            })?;
            agreement.merge_signed_details(&details);
            let merged = agreement.signed_agreement_details.get_or_insert_with(Map::new);
            merged.insert("frameworkAgreementVersion".into(), json!(version));

            require_valid(
                self.validator.as_ref(),
                &SchemaName::agreement_details(),
                merged,
                &ValidationMode::Full,
            )?;

            let uploader = merged.get("uploaderUserId").cloned().unwrap_or(Value::Null);
            let user = match uploader.as_i64() {
                Some(id) => tx.find_user(UserId::new(id)).await?,
                None => None,
            };
            if user.is_none() {
                return Err(ApplicationError::bad_request(format!(
                    "No user found with id '{}'",
                    display_id(&uploader)
                )));
            }
            update = Some(json!({"signedAgreementDetails": details}));
        }

        agreement.sign(Timestamp::now());
        tx.update_agreement(&agreement).await?;
        append_event(tx.as_mut(), AuditType::SignAgreement, &metadata, &agreement, update).await?;
        tx.commit().await?;

        tracing::info!(
            agreement_id = %agreement.id,
            supplier_id = %agreement.supplier_id,
            "Framework agreement signed"
        );

        Ok(agreement)
    }
}

#[derive(Debug, Clone)]
pub struct CountersignAgreementCommand {
    pub agreement_id: AgreementId,
    pub countersigned_agreement_details: Option<Map<String, Value>>,
    pub countersigned_agreement_path: Option<String>,
}

pub struct CountersignAgreementHandler {
    store: Arc<dyn Store>,
}

impl CountersignAgreementHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CountersignAgreementCommand,
        metadata: CommandMetadata,
    ) -> Result<FrameworkAgreement, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let mut agreement = find_agreement(tx.as_mut(), cmd.agreement_id).await?;

        agreement.countersign(
            cmd.countersigned_agreement_details.as_ref(),
            cmd.countersigned_agreement_path.clone(),
            Timestamp::now(),
        )?;

        let mut update = Map::new();
        if let Some(details) = cmd.countersigned_agreement_details {
            update.insert("countersignedAgreementDetails".into(), Value::Object(details));
        }
        if let Some(path) = cmd.countersigned_agreement_path {
            update.insert("countersignedAgreementPath".into(), Value::String(path));
        }

        tx.update_agreement(&agreement).await?;
        append_event(
            tx.as_mut(),
            AuditType::CountersignAgreement,
            &metadata,
            &agreement,
            (!update.is_empty()).then(|| Value::Object(update)),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(agreement_id = %agreement.id, "Framework agreement countersigned");

        Ok(agreement)
    }
}

/// An id as the client wrote it: strings without their JSON quotes.
fn display_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::agreements::{CreateAgreementCommand, CreateAgreementHandler};
    use crate::application::handlers::fixtures::{object, Fixture};
    use crate::application::handlers::suppliers::{RegisterInterestCommand, RegisterInterestHandler};
    use crate::domain::agreement::AgreementStatus;
    use crate::domain::foundation::SupplierId;
    use crate::domain::supplier::User;

    async fn fixture_with_agreement() -> (Fixture, AgreementId) {
        let fixture = Fixture::new().await;
        RegisterInterestHandler::new(fixture.store.clone())
            .handle(
                RegisterInterestCommand { supplier_id: SupplierId::new(1), framework_slug: "g-cloud-7".into() },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        fixture.set_on_framework(1).await;
        let agreement = CreateAgreementHandler::new(fixture.store.clone())
            .handle(
                CreateAgreementCommand { supplier_id: SupplierId::new(1), framework_slug: "g-cloud-7".into() },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        fixture
            .store
            .add_user(User {
                id: UserId::new(123),
                email_address: "supplier@example.com".into(),
                name: "Supplier User".into(),
                role: "supplier".into(),
                supplier_id: Some(SupplierId::new(1)),
                active: true,
                logged_in_at: None,
            })
            .await;
        (fixture, agreement.id)
    }

    fn signer(uploader: i64) -> Map<String, Value> {
        object(json!({"signerName": "name", "signerRole": "role", "uploaderUserId": uploader}))
    }

    fn sign(fixture: &Fixture) -> SignAgreementHandler {
        SignAgreementHandler::new(fixture.store.clone(), fixture.validator.clone())
    }

    #[tokio::test]
    async fn update_rejects_unknown_keys() {
        let (fixture, id) = fixture_with_agreement().await;

        let err = UpdateAgreementHandler::new(fixture.store.clone(), fixture.validator.clone())
            .handle(
                UpdateAgreementCommand { agreement_id: id, update: object(json!({"status": "signed"})) },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_details_requires_agreement_version() {
        let (fixture, id) = fixture_with_agreement().await;

        let err = UpdateAgreementHandler::new(fixture.store.clone(), fixture.validator.clone())
            .handle(
                UpdateAgreementCommand {
                    agreement_id: id,
                    update: object(json!({"signedAgreementDetails": {"signerName": "name"}})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Can not update signedAgreementDetails for a framework agreement without a frameworkAgreementVersion"
        );
    }

    #[tokio::test]
    async fn update_merges_details_and_path() {
        let (fixture, id) = fixture_with_agreement().await;
        fixture.set_agreement_version("g-cloud-7", "v1.0").await;
        let handler = UpdateAgreementHandler::new(fixture.store.clone(), fixture.validator.clone());

        handler
            .handle(
                UpdateAgreementCommand {
                    agreement_id: id,
                    update: object(json!({"signedAgreementDetails": {"signerName": "name"}})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        let agreement = handler
            .handle(
                UpdateAgreementCommand {
                    agreement_id: id,
                    update: object(json!({
                        "signedAgreementDetails": {"signerRole": "role"},
                        "signedAgreementPath": "/agreements/1.pdf"
                    })),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert_eq!(
            agreement.signed_agreement_details,
            Some(object(json!({"signerName": "name", "signerRole": "role"})))
        );
        assert_eq!(agreement.signed_agreement_path.as_deref(), Some("/agreements/1.pdf"));
        assert_eq!(agreement.status(), AgreementStatus::Draft);
    }

    #[tokio::test]
    async fn signing_stamps_version() {
        let (fixture, id) = fixture_with_agreement().await;
        fixture.set_agreement_version("g-cloud-7", "v1.0").await;

        let agreement = sign(&fixture)
            .handle(
                SignAgreementCommand { agreement_id: id, signed_agreement_details: Some(signer(123)) },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert_eq!(agreement.status(), AgreementStatus::Signed);
        let details = agreement.signed_agreement_details.unwrap();
        assert_eq!(details["frameworkAgreementVersion"], "v1.0");
    }

    #[tokio::test]
    async fn signing_requires_details_when_versioned() {
        let (fixture, id) = fixture_with_agreement().await;
        fixture.set_agreement_version("g-cloud-7", "v1.0").await;

        let err = sign(&fixture)
            .handle(
                SignAgreementCommand { agreement_id: id, signed_agreement_details: None },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }

    #[tokio::test]
    async fn signing_requires_known_uploader() {
        let (fixture, id) = fixture_with_agreement().await;
        fixture.set_agreement_version("g-cloud-7", "v1.0").await;

        let err = sign(&fixture)
            .handle(
                SignAgreementCommand { agreement_id: id, signed_agreement_details: Some(signer(999)) },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No user found with id '999'");
    }

    #[test]
    fn uploader_ids_are_shown_without_json_quoting() {
        assert_eq!(display_id(&json!(999)), "999");
        assert_eq!(display_id(&json!("abc")), "abc");
        assert_eq!(display_id(&Value::Null), "null");
    }

    #[tokio::test]
    async fn countersigning_requires_signature() {
        let (fixture, id) = fixture_with_agreement().await;
        let handler = CountersignAgreementHandler::new(fixture.store.clone());
        let cmd = CountersignAgreementCommand {
            agreement_id: id,
            countersigned_agreement_details: None,
            countersigned_agreement_path: Some("/countersigned/1.pdf".into()),
        };

        let err = handler.handle(cmd.clone(), CommandMetadata::test_fixture()).await.unwrap_err();
        assert!(err.to_string().contains("has not been signed"));

        sign(&fixture)
            .handle(
                SignAgreementCommand { agreement_id: id, signed_agreement_details: None },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        let agreement = handler.handle(cmd, CommandMetadata::test_fixture()).await.unwrap();

        assert_eq!(agreement.status(), AgreementStatus::Countersigned);
        assert_eq!(agreement.countersigned_agreement_path.as_deref(), Some("/countersigned/1.pdf"));
    }
}
