//! Query parameters for framework endpoints.

use serde::Deserialize;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::comma_list;
use crate::domain::agreement::AgreementStatus;

/// Query for `GET /frameworks/{slug}/suppliers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameworkSuppliersParams {
    pub agreement_returned: Option<String>,
    pub status: Option<String>,
    pub with_declarations: Option<String>,
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, ApiError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ApiError::bad_request(format!("Invalid value for {}: '{}'", name, raw))),
    }
}

impl FrameworkSuppliersParams {
    pub fn agreement_returned(&self) -> Result<Option<bool>, ApiError> {
        self.agreement_returned
            .as_deref()
            .map(|raw| parse_flag("agreement_returned", raw))
            .transpose()
    }

    pub fn statuses(&self) -> Result<Option<Vec<AgreementStatus>>, ApiError> {
        let Some(raw) = self.status.as_deref() else {
            return Ok(None);
        };
        comma_list(raw)
            .iter()
            .map(|s| {
                AgreementStatus::parse(s)
                    .ok_or_else(|| ApiError::bad_request(format!("Invalid agreement status '{}'", s)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Declarations are included unless explicitly turned off.
    pub fn with_declarations(&self) -> Result<bool, ApiError> {
        self.with_declarations
            .as_deref()
            .map(|raw| parse_flag("with_declarations", raw))
            .transpose()
            .map(|flag| flag.unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters() {
        let params = FrameworkSuppliersParams {
            agreement_returned: Some("True".into()),
            status: Some("signed,countersigned".into()),
            with_declarations: Some("false".into()),
        };

        assert_eq!(params.agreement_returned().unwrap(), Some(true));
        assert_eq!(
            params.statuses().unwrap(),
            Some(vec![AgreementStatus::Signed, AgreementStatus::Countersigned])
        );
        assert!(!params.with_declarations().unwrap());
    }

    #[test]
    fn defaults_include_declarations() {
        let params = FrameworkSuppliersParams::default();
        assert!(params.with_declarations().unwrap());
        assert_eq!(params.statuses().unwrap(), None);
    }

    #[test]
    fn rejects_unknown_status() {
        let params = FrameworkSuppliersParams {
            status: Some("returned".into()),
            ..Default::default()
        };
        assert!(params.statuses().is_err());
    }
}
