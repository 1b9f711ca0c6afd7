//! JSON Schema Validator - Implementation of SchemaValidator.
//!
//! Schemas are embedded in the binary via `include_str!`, parsed once and
//! compiled with the `jsonschema` crate on first use. Full-mode and lenient
//! validators are kept; page-scoped partial validators are compiled per call
//! since their `required` list depends on the page questions.

use std::collections::HashMap;

use jsonschema::error::ValidationErrorKind;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::validation::{
    check_price_ranges, translate_violations, SchemaName, SchemaViolation, ValidationErrors,
    ValidationMode, ViolationKind,
};
use crate::ports::SchemaValidator;

/// Raw schema text keyed by schema name.
static SCHEMA_SOURCES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "services-g-cloud-7-scs",
            include_str!("schemas/services-g-cloud-7-scs.json"),
        ),
        (
            "services-g-cloud-7-saas",
            include_str!("schemas/services-g-cloud-7-saas.json"),
        ),
        (
            "services-digital-outcomes-and-specialists-digital-specialists",
            include_str!("schemas/services-digital-outcomes-and-specialists-digital-specialists.json"),
        ),
        (
            "services-digital-outcomes-and-specialists-digital-outcomes",
            include_str!("schemas/services-digital-outcomes-and-specialists-digital-outcomes.json"),
        ),
        (
            "framework-agreement-details",
            include_str!("schemas/framework-agreement-details.json"),
        ),
        (
            "agreement-details",
            include_str!("schemas/agreement-details.json"),
        ),
    ])
});

/// A parsed schema with its reusable validators.
struct CompiledSchema {
    source: Value,
    full: jsonschema::Validator,
    lenient: jsonschema::Validator,
}

impl CompiledSchema {
    fn compile(source: &str) -> Result<Self, String> {
        let source: Value =
            serde_json::from_str(source).map_err(|e| format!("not valid JSON: {}", e))?;
        let full = jsonschema::validator_for(&source).map_err(|e| format!("failed to compile: {}", e))?;
        let lenient = jsonschema::validator_for(&narrow_for_mode(&source, &ValidationMode::lenient()))
            .map_err(|e| format!("failed to compile: {}", e))?;
        Ok(Self { source, full, lenient })
    }
}

/// Compiled schemas keyed by name. A schema that fails to load keeps its
/// error so every validation against it reports the same failure.
static SCHEMAS: Lazy<HashMap<&'static str, Result<CompiledSchema, String>>> = Lazy::new(|| {
    SCHEMA_SOURCES
        .iter()
        .map(|(name, source)| (*name, CompiledSchema::compile(source)))
        .collect()
});

/// JSON Schema-based validator implementation.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    /// Create a new validator over the embedded schemas.
    pub fn new() -> Self {
        Self
    }

    /// Names of every embedded schema.
    pub fn schema_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = SCHEMA_SOURCES.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn load(&self, name: &SchemaName) -> Result<&'static CompiledSchema, DomainError> {
        let compiled = SCHEMAS.get(name.as_str()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SchemaNotFound,
                format!("No schema found for '{}'", name),
            )
        })?;
        compiled.as_ref().map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Schema '{}' {}", name, e))
        })
    }
}

/// Narrows `required` to the page questions and drops the top-level `anyOf`.
fn narrow_for_mode(schema: &Value, mode: &ValidationMode) -> Value {
    let ValidationMode::Partial { required } = mode else {
        return schema.clone();
    };

    let mut narrowed = schema.clone();
    if let Some(obj) = narrowed.as_object_mut() {
        obj.remove("anyOf");
        let still_required: Vec<Value> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter(|f| f.as_str().map_or(false, |f| required.iter().any(|q| q == f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        obj.insert("required".to_string(), Value::Array(still_required));
    }
    narrowed
}

fn to_violation(error: &jsonschema::ValidationError<'_>) -> SchemaViolation {
    let path: Vec<String> = error
        .instance_path
        .to_string()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    let kind = match &error.kind {
        ValidationErrorKind::Required { property } => ViolationKind::Required {
            property: match property {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        },
        ValidationErrorKind::MinLength { .. } => ViolationKind::MinLength,
        ValidationErrorKind::MinItems { .. } => ViolationKind::MinItems,
        ValidationErrorKind::MaxItems { limit } => ViolationKind::MaxItems { limit: *limit },
        ValidationErrorKind::Format { format } => ViolationKind::Format {
            format: format.to_string(),
        },
        ValidationErrorKind::Pattern { .. } => ViolationKind::Pattern,
        ValidationErrorKind::Enum { .. } => ViolationKind::Enum,
        ValidationErrorKind::AnyOf { .. } => ViolationKind::AnyOf,
        ValidationErrorKind::AdditionalProperties { .. } => ViolationKind::AdditionalProperties,
        ValidationErrorKind::Type { .. } => ViolationKind::Type,
        _ => ViolationKind::Other,
    };

    SchemaViolation::new(path, kind, error.to_string())
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(
        &self,
        schema: &SchemaName,
        document: &Map<String, Value>,
        mode: &ValidationMode,
    ) -> Result<ValidationErrors, DomainError> {
        let compiled = self.load(schema)?;
        let instance = Value::Object(document.clone());

        let page_validator;
        let validator = match mode {
            ValidationMode::Full => &compiled.full,
            ValidationMode::Partial { required } if required.is_empty() => &compiled.lenient,
            ValidationMode::Partial { .. } => {
                page_validator = jsonschema::validator_for(&narrow_for_mode(&compiled.source, mode))
                    .map_err(|e| {
                        DomainError::new(
                            ErrorCode::InternalError,
                            format!("Schema '{}' failed to compile: {}", schema, e),
                        )
                    })?;
                &page_validator
            }
        };

        let violations: Vec<SchemaViolation> =
            validator.iter_errors(&instance).map(|e| to_violation(&e)).collect();

        let mut errors = translate_violations(&violations, &compiled.source);
        check_price_ranges(document, &mut errors);
        Ok(errors)
    }

    fn has_schema(&self, schema: &SchemaName) -> bool {
        SCHEMA_SOURCES.contains_key(schema.as_str())
    }
}
