//! Translation of raw schema violations into client error codes.

use serde_json::Value;

use super::ValidationErrors;

const ANSWER_REQUIRED: &str = "answer_required";

/// The schema keyword that failed, with the parameters the messages need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Required { property: String },
    MinLength,
    MinItems,
    MaxItems { limit: u64 },
    Format { format: String },
    Pattern,
    Enum,
    AnyOf,
    AdditionalProperties,
    Type,
    Other,
}

impl ViolationKind {
    /// JSON schema keyword, used to look up per-property message overrides.
    pub fn keyword(&self) -> &'static str {
        match self {
            ViolationKind::Required { .. } => "required",
            ViolationKind::MinLength => "minLength",
            ViolationKind::MinItems => "minItems",
            ViolationKind::MaxItems { .. } => "maxItems",
            ViolationKind::Format { .. } => "format",
            ViolationKind::Pattern => "pattern",
            ViolationKind::Enum => "enum",
            ViolationKind::AnyOf => "anyOf",
            ViolationKind::AdditionalProperties => "additionalProperties",
            ViolationKind::Type => "type",
            ViolationKind::Other => "other",
        }
    }
}

/// A single failure reported by a schema validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Instance path segments, outermost first. Empty for document-level errors.
    pub path: Vec<String>,
    pub kind: ViolationKind,
    /// Validator supplied message, used when no error code applies.
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: Vec<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Top-level field the violation belongs to.
    pub fn key(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// True for the money fields whose pattern failures read `not_money_format`.
pub(crate) fn is_price_key(key: &str) -> bool {
    key == "priceMin" || key == "priceMax" || key.ends_with("PriceMin") || key.ends_with("PriceMax")
}

/// Builds the client error map for a set of violations against `schema`.
pub fn translate_violations(violations: &[SchemaViolation], schema: &Value) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for violation in violations {
        match violation.key() {
            Some(key) => {
                let message = custom_message(schema, key, &violation.kind)
                    .unwrap_or_else(|| field_message(key, violation));
                errors.insert(key, message);
            }
            None => match &violation.kind {
                ViolationKind::Required { property } => {
                    let message = custom_message(schema, property, &violation.kind)
                        .unwrap_or_else(|| ANSWER_REQUIRED.to_string());
                    errors.insert(property.clone(), message);
                }
                ViolationKind::AnyOf => match any_of_title(schema) {
                    Some(title) => errors.push_form_error(format!("{}_required", title)),
                    None => errors.push_form_error(violation.message.clone()),
                },
                _ => errors.push_form_error(violation.message.clone()),
            },
        }
    }

    errors
}

fn field_message(key: &str, violation: &SchemaViolation) -> String {
    match &violation.kind {
        ViolationKind::Required { .. } | ViolationKind::MinLength | ViolationKind::MinItems => {
            ANSWER_REQUIRED.to_string()
        }
        ViolationKind::MaxItems { limit } => format!("under_{}_items", limit),
        ViolationKind::Format { format } => format!("{}_format", format),
        ViolationKind::Pattern if is_price_key(key) => "not_money_format".to_string(),
        ViolationKind::Enum if key == "priceUnit" => "no_unit_specified".to_string(),
        _ => violation.message.clone(),
    }
}

fn custom_message(schema: &Value, key: &str, kind: &ViolationKind) -> Option<String> {
    schema
        .get("properties")?
        .get(key)?
        .get("errorMessages")?
        .get(kind.keyword())?
        .as_str()
        .map(str::to_string)
}

fn any_of_title(schema: &Value) -> Option<&str> {
    schema.get("anyOf")?.get(0)?.get("title")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn violation(path: &[&str], kind: ViolationKind, message: &str) -> SchemaViolation {
        SchemaViolation::new(path.iter().map(|s| s.to_string()).collect(), kind, message)
    }

    #[test]
    fn required_at_root_is_keyed_by_missing_property() {
        let errors = translate_violations(
            &[violation(
                &[],
                ViolationKind::Required { property: "serviceName".into() },
                "\"serviceName\" is a required property",
            )],
            &json!({}),
        );
        assert_eq!(errors.to_json(), json!({"serviceName": "answer_required"}));
    }

    #[test]
    fn length_and_item_counts_map_to_codes() {
        let errors = translate_violations(
            &[
                violation(&["serviceSummary"], ViolationKind::MinLength, "too short"),
                violation(&["serviceFeatures"], ViolationKind::MinItems, "too few"),
                violation(&["serviceBenefits"], ViolationKind::MaxItems { limit: 10 }, "too many"),
                violation(&["supportEmail"], ViolationKind::Format { format: "email".into() }, "bad"),
            ],
            &json!({}),
        );
        assert_eq!(
            errors.to_json(),
            json!({
                "serviceSummary": "answer_required",
                "serviceFeatures": "answer_required",
                "serviceBenefits": "under_10_items",
                "supportEmail": "email_format",
            })
        );
    }

    #[test]
    fn price_patterns_and_units_have_dedicated_codes() {
        let errors = translate_violations(
            &[
                violation(&["priceMin"], ViolationKind::Pattern, "does not match"),
                violation(&["agileCoachPriceMax"], ViolationKind::Pattern, "does not match"),
                violation(&["priceUnit"], ViolationKind::Enum, "not one of"),
                violation(&["serviceName"], ViolationKind::Pattern, "does not match"),
            ],
            &json!({}),
        );
        assert_eq!(errors.field("priceMin"), Some("not_money_format"));
        assert_eq!(errors.field("agileCoachPriceMax"), Some("not_money_format"));
        assert_eq!(errors.field("priceUnit"), Some("no_unit_specified"));
        assert_eq!(errors.field("serviceName"), Some("does not match"));
    }

    #[test]
    fn nested_paths_use_first_segment() {
        let errors = translate_violations(
            &[violation(
                &["serviceTypes", "0"],
                ViolationKind::Enum,
                "'Bad Type' is not one of ['Implementation']",
            )],
            &json!({}),
        );
        assert!(errors.field("serviceTypes").unwrap().contains("'Bad Type' is not one of"));
    }

    #[test]
    fn any_of_failure_uses_first_branch_title() {
        let schema = json!({"anyOf": [{"title": "specialist", "required": ["a"]}]});
        let errors = translate_violations(
            &[violation(&[], ViolationKind::AnyOf, "not valid under any schema")],
            &schema,
        );
        assert_eq!(errors.form_errors(), ["specialist_required".to_string()]);
    }

    #[test]
    fn unexpected_properties_go_to_form_errors() {
        let errors = translate_violations(
            &[violation(
                &[],
                ViolationKind::AdditionalProperties,
                "Additional properties are not allowed ('badField' was unexpected)",
            )],
            &json!({}),
        );
        assert!(errors.form_errors()[0].contains("'badField' was unexpected"));
    }

    #[test]
    fn property_error_messages_override_defaults() {
        let schema = json!({
            "properties": {
                "serviceBenefits": {"errorMessages": {"pattern": "under_10_words"}}
            }
        });
        let errors = translate_violations(
            &[violation(&["serviceBenefits", "1"], ViolationKind::Pattern, "does not match")],
            &schema,
        );
        assert_eq!(errors.field("serviceBenefits"), Some("under_10_words"));
    }
}
