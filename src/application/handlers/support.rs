//! Helpers shared by the command handlers.

use serde_json::{Map, Value};

use crate::application::ApplicationError;
use crate::domain::foundation::{ServiceId, SupplierId};
use crate::domain::service::Service;
use crate::domain::validation::{SchemaName, ValidationMode};
use crate::ports::{SchemaValidator, SearchIndex};

/// Runs schema validation, turning a non-empty error map into `Invalid`.
pub(crate) fn require_valid(
    validator: &dyn SchemaValidator,
    schema: &SchemaName,
    document: &Map<String, Value>,
    mode: &ValidationMode,
) -> Result<(), ApplicationError> {
    let errors = validator.validate(schema, document, mode)?;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApplicationError::Invalid(errors))
    }
}

/// Reads a supplier id given as a JSON number or numeric string.
pub(crate) fn supplier_id_from(value: Option<&Value>) -> Result<SupplierId, ApplicationError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().map(SupplierId::new),
        Some(Value::String(s)) => s.parse::<SupplierId>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        let shown = match value {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        ApplicationError::bad_request(format!("Invalid supplier ID '{}'", shown))
    })
}

/// Sends a committed service to the search index. Failures are logged only.
pub(crate) async fn index_service(search: &dyn SearchIndex, service: &Service) {
    if let Err(e) = search.index(&service.service_id, &service.to_document()).await {
        tracing::warn!(service_id = %service.service_id, error = %e, "Failed to index service");
    }
}

/// Removes a service from the search index. Failures are logged only.
pub(crate) async fn unindex_service(search: &dyn SearchIndex, id: &ServiceId) {
    if let Err(e) = search.delete(id).await {
        tracing::warn!(service_id = %id, error = %e, "Failed to remove service from index");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn supplier_ids_accept_numbers_and_numeric_strings() {
        assert_eq!(supplier_id_from(Some(&json!(1))).unwrap(), SupplierId::new(1));
        assert_eq!(supplier_id_from(Some(&json!("7"))).unwrap(), SupplierId::new(7));
    }

    #[test]
    fn invalid_supplier_ids_are_reported_verbatim() {
        let err = supplier_id_from(Some(&json!("ShouldBeInt"))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid supplier ID 'ShouldBeInt'");
        assert!(supplier_id_from(None).is_err());
    }
}
