//! Service content validation vocabulary.
//!
//! Schemas are applied by the `SchemaValidator` port. This module owns what
//! happens around that call: which schema applies, how strict the check is,
//! how raw schema violations become the error map returned to clients, and
//! the cross-field price checks no schema keyword expresses.

mod error_map;
mod price;
mod schema;
mod translation;

pub use error_map::{ValidationErrors, FORM_ERRORS_KEY};
pub use price::check_price_ranges;
pub use schema::{SchemaName, ValidationMode};
pub use translation::{translate_violations, SchemaViolation, ViolationKind};
