//! Handlers for a supplier's registration on a framework.
//!
//! - `RegisterInterestHandler` creates the registration
//! - `GetInterestHandler` reads it
//! - `SetOnFrameworkHandler` records the assessment outcome
//! - `SetDeclarationHandler` replaces the selection answers

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::application::handlers::frameworks::find_framework;
use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, SupplierId};
use crate::domain::framework::Framework;
use crate::domain::supplier::SupplierFramework;
use crate::ports::{AuditEventRepository, IsolationLevel, Store, StoreTransaction, SupplierRepository};

async fn find_registration(
    tx: &mut dyn StoreTransaction,
    supplier_id: SupplierId,
    framework_slug: &str,
) -> Result<(Framework, SupplierFramework), ApplicationError> {
    let framework = find_framework(&mut *tx, framework_slug).await?;
    let registration = tx
        .find_supplier_framework(supplier_id, framework.id)
        .await?
        .ok_or_else(|| {
            ApplicationError::not_found(format!(
                "supplier_id '{}' has not registered interest in '{}'",
                supplier_id, framework_slug
            ))
        })?;
    Ok((framework, registration))
}

#[derive(Debug, Clone)]
pub struct RegisterInterestCommand {
    pub supplier_id: SupplierId,
    pub framework_slug: String,
}

#[derive(Debug, Clone)]
pub struct RegisterInterestResult {
    pub supplier_framework: SupplierFramework,

    /// False when the supplier was already registered.
    pub created: bool,
}

pub struct RegisterInterestHandler {
    store: Arc<dyn Store>,
}

impl RegisterInterestHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: RegisterInterestCommand,
        metadata: CommandMetadata,
    ) -> Result<RegisterInterestResult, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let supplier = tx.find_supplier(cmd.supplier_id).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("supplier_id '{}' not found", cmd.supplier_id))
        })?;
        let framework = find_framework(tx.as_mut(), &cmd.framework_slug).await?;
        if !framework.status.accepts_submissions() {
            return Err(ApplicationError::bad_request(format!(
                "'{}' framework is not open",
                framework.slug
            )));
        }

        if let Some(existing) = tx.find_supplier_framework(supplier.supplier_id, framework.id).await? {
            return Ok(RegisterInterestResult {
                supplier_framework: existing,
                created: false,
            });
        }

        let registration = SupplierFramework::register(
            supplier.supplier_id,
            supplier.name,
            framework.id,
            framework.slug.clone(),
        );
        tx.insert_supplier_framework(&registration).await?;

        let event = NewAuditEvent::new(
            AuditType::RegisterFrameworkInterest,
            &metadata,
            json!({"supplierId": registration.supplier_id, "frameworkSlug": framework.slug}),
        )
        .for_object(AuditObject::supplier_framework(registration.supplier_id, framework.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(
            supplier_id = %registration.supplier_id,
            framework = %framework.slug,
            "Framework interest registered"
        );

        Ok(RegisterInterestResult {
            supplier_framework: registration,
            created: true,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GetInterestQuery {
    pub supplier_id: SupplierId,
    pub framework_slug: String,
}

pub struct GetInterestHandler {
    store: Arc<dyn Store>,
}

impl GetInterestHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetInterestQuery) -> Result<SupplierFramework, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let (_, registration) =
            find_registration(tx.as_mut(), query.supplier_id, &query.framework_slug).await?;
        Ok(registration)
    }
}

#[derive(Debug, Clone)]
pub struct SetOnFrameworkCommand {
    pub supplier_id: SupplierId,
    pub framework_slug: String,
    /// The `frameworkInterest` object from the request.
    pub payload: Map<String, Value>,
}

pub struct SetOnFrameworkHandler {
    store: Arc<dyn Store>,
}

impl SetOnFrameworkHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: SetOnFrameworkCommand,
        metadata: CommandMetadata,
    ) -> Result<SupplierFramework, ApplicationError> {
        let on_framework = match cmd.payload.get("onFramework") {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Null) => None,
            _ => {
                return Err(ApplicationError::bad_request(
                    "Invalid JSON must have 'onFramework' key with a boolean value",
                ))
            }
        };

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let (framework, mut registration) =
            find_registration(tx.as_mut(), cmd.supplier_id, &cmd.framework_slug).await?;

        registration.on_framework = on_framework;
        tx.update_supplier_framework(&registration).await?;

        let event = NewAuditEvent::new(
            AuditType::SupplierUpdate,
            &metadata,
            json!({
                "supplierId": registration.supplier_id,
                "frameworkSlug": framework.slug,
                "update": Value::Object(cmd.payload),
            }),
        )
        .for_object(AuditObject::supplier_framework(registration.supplier_id, framework.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(
            supplier_id = %registration.supplier_id,
            framework = %framework.slug,
            on_framework = ?on_framework,
            "On-framework status set"
        );

        Ok(registration)
    }
}

#[derive(Debug, Clone)]
pub struct SetDeclarationCommand {
    pub supplier_id: SupplierId,
    pub framework_slug: String,
    pub declaration: Map<String, Value>,
}

pub struct SetDeclarationHandler {
    store: Arc<dyn Store>,
}

impl SetDeclarationHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: SetDeclarationCommand,
        metadata: CommandMetadata,
    ) -> Result<SupplierFramework, ApplicationError> {
        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let (framework, mut registration) =
            find_registration(tx.as_mut(), cmd.supplier_id, &cmd.framework_slug).await?;

        let declaration = Value::Object(cmd.declaration);
        registration.declaration = Some(declaration.clone());
        tx.update_supplier_framework(&registration).await?;

        let event = NewAuditEvent::new(
            AuditType::AnswerSelectionQuestions,
            &metadata,
            json!({
                "supplierId": registration.supplier_id,
                "frameworkSlug": framework.slug,
                "declaration": declaration,
            }),
        )
        .for_object(AuditObject::supplier_framework(registration.supplier_id, framework.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(
            supplier_id = %registration.supplier_id,
            framework = %framework.slug,
            "Declaration saved"
        );

        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::{object, Fixture};
    use crate::domain::foundation::FrameworkStatus;

    fn register_command() -> RegisterInterestCommand {
        RegisterInterestCommand {
            supplier_id: SupplierId::new(1),
            framework_slug: "g-cloud-7".into(),
        }
    }

    #[tokio::test]
    async fn registering_twice_returns_existing() {
        let fixture = Fixture::new().await;
        let handler = RegisterInterestHandler::new(fixture.store.clone());

        let first = handler.handle(register_command(), CommandMetadata::test_fixture()).await.unwrap();
        let second = handler.handle(register_command(), CommandMetadata::test_fixture()).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(fixture.store.audit_event_count().await, 1);
    }

    #[tokio::test]
    async fn framework_must_be_open() {
        let fixture = Fixture::with_g7_status(FrameworkStatus::Live).await;

        let err = RegisterInterestHandler::new(fixture.store.clone())
            .handle(register_command(), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "'g-cloud-7' framework is not open");
    }

    #[tokio::test]
    async fn declaration_and_on_framework_are_stored() {
        let fixture = Fixture::new().await;
        RegisterInterestHandler::new(fixture.store.clone())
            .handle(register_command(), CommandMetadata::test_fixture())
            .await
            .unwrap();

        SetDeclarationHandler::new(fixture.store.clone())
            .handle(
                SetDeclarationCommand {
                    supplier_id: SupplierId::new(1),
                    framework_slug: "g-cloud-7".into(),
                    declaration: object(json!({"status": "started"})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        SetOnFrameworkHandler::new(fixture.store.clone())
            .handle(
                SetOnFrameworkCommand {
                    supplier_id: SupplierId::new(1),
                    framework_slug: "g-cloud-7".into(),
                    payload: object(json!({"onFramework": true})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        let interest = GetInterestHandler::new(fixture.store.clone())
            .handle(GetInterestQuery { supplier_id: SupplierId::new(1), framework_slug: "g-cloud-7".into() })
            .await
            .unwrap();
        assert_eq!(interest.declaration_status(), Some("started"));
        assert!(interest.is_on_framework());
    }

    #[tokio::test]
    async fn interest_without_registration_is_not_found() {
        let fixture = Fixture::new().await;

        let err = GetInterestHandler::new(fixture.store.clone())
            .handle(GetInterestQuery { supplier_id: SupplierId::new(1), framework_slug: "g-cloud-7".into() })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn on_framework_must_be_boolean() {
        let fixture = Fixture::new().await;

        let err = SetOnFrameworkHandler::new(fixture.store.clone())
            .handle(
                SetOnFrameworkCommand {
                    supplier_id: SupplierId::new(1),
                    framework_slug: "g-cloud-7".into(),
                    payload: object(json!({"onFramework": "yes"})),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }
}
