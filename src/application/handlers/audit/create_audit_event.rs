use std::sync::Arc;

use serde_json::{Map, Value};

use crate::application::ApplicationError;
use crate::domain::audit::{AuditEvent, AuditObject, AuditObjectType, AuditType, NewAuditEvent};
use crate::ports::{AuditEventRepository, IsolationLevel, Store};

/// A free-standing audit event, as posted in `auditEvents`.
#[derive(Debug, Clone)]
pub struct CreateAuditEventCommand {
    pub payload: Map<String, Value>,
}

impl CreateAuditEventCommand {
    fn to_event(&self) -> Result<NewAuditEvent, ApplicationError> {
        let audit_type: AuditType = self
            .payload
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ApplicationError::bad_request("Invalid JSON must have 'type' key"))?
            .parse()?;
        let user = self
            .payload
            .get("user")
            .and_then(Value::as_str)
            .ok_or_else(|| ApplicationError::bad_request("Invalid JSON must have 'user' key"))?;
        let data = match self.payload.get("data") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(data @ Value::Object(_)) => data.clone(),
            Some(_) => return Err(ApplicationError::bad_request("'data' must be an object")),
        };

        let object = match (self.payload.get("objectType"), self.payload.get("objectId")) {
            (None, None) => None,
            (Some(Value::String(kind)), Some(id)) => {
                let kind = AuditObjectType::parse(kind).ok_or_else(|| {
                    ApplicationError::bad_request(format!("invalid objectType '{}'", kind))
                })?;
                let id = match id {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some(AuditObject::new(kind, id))
            }
            _ => {
                return Err(ApplicationError::bad_request(
                    "objectType and objectId must be given together",
                ))
            }
        };

        Ok(NewAuditEvent {
            audit_type,
            user: user.to_string(),
            data,
            object,
        })
    }
}

pub struct CreateAuditEventHandler {
    store: Arc<dyn Store>,
}

impl CreateAuditEventHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: CreateAuditEventCommand) -> Result<AuditEvent, ApplicationError> {
        let event = cmd.to_event()?;

        let mut tx = self.store.begin(IsolationLevel::ReadCommitted).await?;
        let stored = tx.append_audit_event(&event).await?;
        tx.commit().await?;

        tracing::info!(audit_id = %stored.id, audit_type = %stored.audit_type, "Audit event created");

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::Fixture;
    use serde_json::json;

    fn command(payload: Value) -> CreateAuditEventCommand {
        CreateAuditEventCommand { payload: payload.as_object().cloned().unwrap() }
    }

    #[tokio::test]
    async fn appends_event_with_object() {
        let fixture = Fixture::new().await;

        let event = CreateAuditEventHandler::new(fixture.store.clone())
            .handle(command(json!({
                "type": "contact_update",
                "user": "joeblogs",
                "data": {"contact": 1},
                "objectType": "Supplier",
                "objectId": 1
            })))
            .await
            .unwrap();

        assert_eq!(event.audit_type, AuditType::ContactUpdate);
        assert_eq!(event.object.unwrap().object_id, "1");
        assert_eq!(fixture.store.audit_event_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_type_is_rejected() {
        let fixture = Fixture::new().await;

        let err = CreateAuditEventHandler::new(fixture.store.clone())
            .handle(command(json!({"type": "invalid", "user": "joeblogs"})))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::BadRequest(_)));
        assert_eq!(fixture.store.audit_event_count().await, 0);
    }
}
