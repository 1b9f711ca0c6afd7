//! Strongly-typed identifier value objects.
//!
//! Row identifiers are database-assigned integers. Service identifiers are
//! strings: either generated 16-digit numbers or legacy imported ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database identifier.
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| ValidationError::invalid_format($label, format!("'{}' is not an integer", s)))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

integer_id!(
    /// Identifier of a framework row.
    FrameworkId,
    "framework_id"
);
integer_id!(
    /// Identifier of a lot row.
    LotId,
    "lot_id"
);
integer_id!(
    /// Supplier identifier, assigned by the marketplace when a supplier registers.
    SupplierId,
    "supplier_id"
);
integer_id!(
    /// Identifier of a user account.
    UserId,
    "user_id"
);
integer_id!(
    /// Identifier of a draft service.
    DraftId,
    "draft_id"
);
integer_id!(
    /// Identifier of an archived service snapshot.
    ArchivedServiceId,
    "archived_service_id"
);
integer_id!(
    /// Identifier of a framework agreement.
    AgreementId,
    "agreement_id"
);
integer_id!(
    /// Identifier of an audit event.
    AuditEventId,
    "audit_event_id"
);

/// Number of digits in a generated service id.
pub const GENERATED_SERVICE_ID_LENGTH: usize = 16;

const IMPORTED_SERVICE_ID_MIN: usize = 10;
const IMPORTED_SERVICE_ID_MAX: usize = 20;

/// Public identifier of a live service.
///
/// Accepts lowercase ascii letters, digits and hyphens, between 10 and 20
/// characters. Generated ids are always 16 digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceId(String);

impl ServiceId {
    /// Validates and wraps a service id.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let valid_length =
            (IMPORTED_SERVICE_ID_MIN..=IMPORTED_SERVICE_ID_MAX).contains(&value.len());
        let valid_chars = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if !valid_length || !valid_chars {
            return Err(ValidationError::invalid_format(
                "service_id",
                format!("'{}' is not a valid service id", value),
            ));
        }
        Ok(Self(value))
    }

    /// Builds a generated id from a 16 digit number.
    pub fn from_number(number: u64) -> Result<Self, ValidationError> {
        let value = number.to_string();
        if value.len() != GENERATED_SERVICE_ID_LENGTH {
            return Err(ValidationError::invalid_format(
                "service_id",
                format!("generated id '{}' must have {} digits", value, GENERATED_SERVICE_ID_LENGTH),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ServiceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ServiceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceId> for String {
    fn from(id: ServiceId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_parse_from_strings() {
        let id: SupplierId = "42".parse().unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn integer_ids_reject_non_numeric_input() {
        let err = "abc".parse::<DraftId>().unwrap_err();
        assert!(err.to_string().contains("draft_id"));
    }

    #[test]
    fn service_id_accepts_generated_and_legacy_formats() {
        assert!(ServiceId::new("1234567890123456").is_ok());
        assert!(ServiceId::new("4-g2-0123-456").is_ok());
    }

    #[test]
    fn service_id_rejects_bad_formats() {
        assert!(ServiceId::new("short").is_err());
        assert!(ServiceId::new("123456789012345678901").is_err());
        assert!(ServiceId::new("UPPER-case-id").is_err());
        assert!(ServiceId::new("1234567890_123").is_err());
    }

    #[test]
    fn from_number_requires_sixteen_digits() {
        assert!(ServiceId::from_number(1_000_000_000_000_000).is_ok());
        assert!(ServiceId::from_number(999).is_err());
    }

    #[test]
    fn service_id_deserializes_with_validation() {
        let ok: Result<ServiceId, _> = serde_json::from_str("\"1234567890123456\"");
        assert!(ok.is_ok());
        let bad: Result<ServiceId, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }
}
