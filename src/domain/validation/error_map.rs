//! Error map returned for invalid service documents.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key holding errors that do not belong to a single field.
pub const FORM_ERRORS_KEY: &str = "_form";

/// Per-field validation errors plus a list of form-level errors.
///
/// Only the first error reported for a field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
    form: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }

    /// Records an error for a field unless one is already present.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Replaces whatever error a field currently has.
    pub fn replace(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(field.into(), message.into());
    }

    pub fn push_form_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.form.contains(&message) {
            self.form.push(message);
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn form_errors(&self) -> &[String] {
        &self.form
    }

    /// Renders the map the way API clients receive it.
    pub fn to_json(&self) -> Value {
        let mut map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        if !self.form.is_empty() {
            map.insert(
                FORM_ERRORS_KEY.to_string(),
                Value::Array(self.form.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.insert("priceMin", "not_money_format");
        errors.insert("priceMin", "answer_required");
        assert_eq!(errors.field("priceMin"), Some("not_money_format"));
    }

    #[test]
    fn replace_overrides_existing_error() {
        let mut errors = ValidationErrors::new();
        errors.insert("priceMax", "answer_required");
        errors.replace("priceMax", "max_less_than_min");
        assert_eq!(errors.field("priceMax"), Some("max_less_than_min"));
    }

    #[test]
    fn json_includes_form_errors_only_when_present() {
        let mut errors = ValidationErrors::new();
        errors.insert("serviceName", "answer_required");
        assert_eq!(errors.to_json(), json!({"serviceName": "answer_required"}));

        errors.push_form_error("specialist_required");
        errors.push_form_error("specialist_required");
        assert_eq!(
            errors.to_json(),
            json!({"serviceName": "answer_required", "_form": ["specialist_required"]})
        );
    }

    #[test]
    fn empty_map_is_empty() {
        assert!(ValidationErrors::new().is_empty());
        assert_eq!(ValidationErrors::new().to_json(), json!({}));
    }
}
