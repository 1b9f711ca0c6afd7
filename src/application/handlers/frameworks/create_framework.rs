//! CreateFrameworkHandler - Command handler for opening a new procurement round.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::application::ApplicationError;
use crate::domain::audit::{AuditObject, AuditType, NewAuditEvent};
use crate::domain::foundation::{CommandMetadata, FrameworkStatus};
use crate::domain::framework::{Framework, Lot, NewFramework};
use crate::ports::{AuditEventRepository, FrameworkRepository, IsolationLevel, Store};

const FRAMEWORK_KEYS: [&str; 6] =
    ["slug", "name", "framework", "status", "clarificationQuestionsOpen", "lots"];

#[derive(Debug, Clone)]
pub struct CreateFrameworkCommand {
    /// The `frameworks` object from the request.
    pub payload: Map<String, Value>,
}

pub struct CreateFrameworkHandler {
    store: Arc<dyn Store>,
}

impl CreateFrameworkHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CreateFrameworkCommand,
        metadata: CommandMetadata,
    ) -> Result<Framework, ApplicationError> {
        let keys: BTreeSet<&str> = cmd.payload.keys().map(String::as_str).collect();
        if keys != FRAMEWORK_KEYS.into_iter().collect() {
            return Err(ApplicationError::bad_request(format!(
                "Invalid JSON should only have '{}' keys",
                FRAMEWORK_KEYS.join("', '")
            )));
        }

        let lot_slugs: Vec<String> = cmd.payload["lots"]
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;

        let lots = tx.find_lots(&lot_slugs).await?;
        let unknown: Vec<&str> = lot_slugs
            .iter()
            .map(String::as_str)
            .filter(|slug| !lots.iter().any(|lot| lot.slug == *slug))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !unknown.is_empty() {
            return Err(ApplicationError::bad_request(format!(
                "Invalid lot slugs: {}",
                unknown.join(", ")
            )));
        }

        let new_framework = parse_framework(&cmd.payload, lots)
            .ok_or_else(|| ApplicationError::bad_request("Invalid framework"))?;
        let framework = tx.insert_framework(&new_framework).await?;

        let event = NewAuditEvent::new(
            AuditType::CreateFramework,
            &metadata,
            json!({"update": Value::Object(cmd.payload)}),
        )
        .for_object(AuditObject::framework(framework.id));
        tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(framework = %framework.slug, "Framework created");

        Ok(framework)
    }
}

fn parse_framework(
    payload: &Map<String, Value>,
    lots: Vec<Lot>,
) -> Option<NewFramework> {
    Some(NewFramework {
        slug: payload["slug"].as_str()?.to_string(),
        name: payload["name"].as_str()?.to_string(),
        framework: payload["framework"].as_str()?.to_string(),
        status: payload["status"].as_str()?.parse::<FrameworkStatus>().ok()?,
        clarification_questions_open: payload["clarificationQuestionsOpen"].as_bool()?,
        lots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;

    fn payload(extra: Value) -> Map<String, Value> {
        let mut payload = json!({
            "slug": "example",
            "name": "Example",
            "framework": "g-cloud",
            "status": "open",
            "clarificationQuestionsOpen": true,
            "lots": ["saas", "paas"]
        });
        for (k, v) in extra.as_object().cloned().unwrap() {
            payload[k] = v;
        }
        payload.as_object().cloned().unwrap()
    }

    async fn create(fixture: &Fixture, extra: Value) -> Result<Framework, ApplicationError> {
        CreateFrameworkHandler::new(fixture.store.clone())
            .handle(CreateFrameworkCommand { payload: payload(extra) }, CommandMetadata::test_fixture())
            .await
    }

    #[tokio::test]
    async fn creates_framework_with_lots() {
        let fixture = Fixture::new().await;

        let framework = create(&fixture, json!({})).await.unwrap();

        assert_eq!(framework.slug, "example");
        assert_eq!(framework.status, FrameworkStatus::Open);
        let lots: Vec<&str> = framework.lots.iter().map(|l| l.slug.as_str()).collect();
        assert_eq!(lots, vec!["saas", "paas"]);
    }

    #[tokio::test]
    async fn rejects_unknown_lots_sorted() {
        let fixture = Fixture::new().await;

        let err = create(&fixture, json!({"lots": ["saas", "zzz", "bad-lot"]})).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid lot slugs: bad-lot, zzz");
    }

    #[tokio::test]
    async fn rejects_invalid_status() {
        let fixture = Fixture::new().await;

        let err = create(&fixture, json!({"status": "invalid"})).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid framework");
    }

    #[tokio::test]
    async fn rejects_extra_keys() {
        let fixture = Fixture::new().await;

        let err = create(&fixture, json!({"other": 1})).await.unwrap_err();

        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let fixture = Fixture::new().await;

        let err = create(&fixture, json!({"slug": "g-cloud-7"})).await.unwrap_err();

        match err {
            ApplicationError::Domain(e) => assert_eq!(e.message, "Slug 'g-cloud-7' already in use"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
