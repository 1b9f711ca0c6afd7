//! Schema validator port.
//!
//! Validates JSON documents against named, embedded schemas and reports
//! failures as a client-facing error map.

use serde_json::{Map, Value};

use crate::domain::foundation::DomainError;
use crate::domain::validation::{SchemaName, ValidationErrors, ValidationMode};

/// Port for schema validation of service and agreement documents.
///
/// # Contract
///
/// Implementations must:
/// - Enforce every `required` field and the top-level `anyOf` in full mode
/// - In partial mode, require only the listed questions the schema requires
/// - Key errors by the first element of the instance path
/// - Keep only the first error per key
///
/// # Usage
///
/// ```rust,ignore
/// let errors = validator.validate(&draft.schema_name(), &draft.data, &ValidationMode::Full)?;
/// if !errors.is_empty() {
///     return Err(ApplicationError::Invalid(errors));
/// }
/// ```
pub trait SchemaValidator: Send + Sync {
    /// Validates `document`, returning an empty map when it is valid.
    ///
    /// # Errors
    ///
    /// - `SchemaNotFound` if no schema has the name
    fn validate(
        &self,
        schema: &SchemaName,
        document: &Map<String, Value>,
        mode: &ValidationMode,
    ) -> Result<ValidationErrors, DomainError>;

    /// True if a schema with this name is embedded.
    fn has_schema(&self, schema: &SchemaName) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_validator_is_object_safe() {
        fn _accepts_dyn(_validator: &dyn SchemaValidator) {}
    }
}
