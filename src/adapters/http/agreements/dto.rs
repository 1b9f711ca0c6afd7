//! Request body readers for agreement endpoints.

use serde_json::{Map, Value};

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::SupplierId;

/// `agreement{supplierId, frameworkSlug}` from a create request.
pub fn create_fields(agreement: &Map<String, Value>) -> Result<(SupplierId, String), ApiError> {
    let supplier_id = match agreement.get("supplierId") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .map(SupplierId::new)
    .ok_or_else(|| ApiError::bad_request("Invalid JSON must have 'supplierId' key"))?;

    let framework_slug = agreement
        .get("frameworkSlug")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request("Invalid JSON must have 'frameworkSlug' key"))?
        .to_string();

    Ok((supplier_id, framework_slug))
}

/// An optional nested object inside `agreement`.
pub fn optional_object(
    agreement: Option<&Map<String, Value>>,
    key: &str,
) -> Result<Option<Map<String, Value>>, ApiError> {
    match agreement.and_then(|a| a.get(key)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(_) => Err(ApiError::bad_request(format!("'{}' must be an object", key))),
    }
}

/// An optional string inside `agreement`.
pub fn optional_string(
    agreement: Option<&Map<String, Value>>,
    key: &str,
) -> Result<Option<String>, ApiError> {
    match agreement.and_then(|a| a.get(key)) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ApiError::bad_request(format!("'{}' must be a string", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn create_fields_accept_numeric_and_string_ids() {
        let (id, slug) =
            create_fields(&map(json!({"supplierId": 1, "frameworkSlug": "g-cloud-8"}))).unwrap();
        assert_eq!(id, SupplierId::new(1));
        assert_eq!(slug, "g-cloud-8");

        let (id, _) =
            create_fields(&map(json!({"supplierId": "2", "frameworkSlug": "g-cloud-8"}))).unwrap();
        assert_eq!(id, SupplierId::new(2));
    }

    #[test]
    fn create_fields_require_both_keys() {
        assert!(create_fields(&map(json!({"frameworkSlug": "g-cloud-8"}))).is_err());
        assert!(create_fields(&map(json!({"supplierId": 1}))).is_err());
    }

    #[test]
    fn optional_values_reject_wrong_types() {
        let agreement = map(json!({"countersignedAgreementPath": 3, "details": {"a": 1}}));
        assert!(optional_string(Some(&agreement), "countersignedAgreementPath").is_err());
        assert!(optional_object(Some(&agreement), "details").unwrap().is_some());
        assert!(optional_object(None, "details").unwrap().is_none());
    }
}
