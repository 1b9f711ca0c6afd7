//! Query parameters for service endpoints.

use serde::Deserialize;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::comma_list;
use crate::domain::foundation::{ServiceStatus, SupplierId};
use crate::domain::service::ServiceFilter;

/// Query parameters for `GET /services`.
///
/// Everything arrives as a string so that malformed values produce the
/// API's own error messages instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct ListServicesParams {
    pub supplier_id: Option<String>,
    pub framework: Option<String>,
    pub status: Option<String>,
    pub lot: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    pub page: Option<String>,
}

impl ListServicesParams {
    pub fn filter(&self) -> Result<ServiceFilter, ApiError> {
        let supplier_id = match &self.supplier_id {
            None => None,
            Some(raw) => Some(
                raw.trim()
                    .parse::<SupplierId>()
                    .map_err(|_| ApiError::bad_request("Invalid supplier_id"))?,
            ),
        };

        let statuses = match &self.status {
            None => Vec::new(),
            Some(raw) => comma_list(raw)
                .iter()
                .map(|s| s.parse::<ServiceStatus>())
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(ServiceFilter {
            supplier_id,
            framework_slugs: self.framework.as_deref().map(comma_list),
            statuses,
            lot: non_empty(&self.lot),
            location: non_empty(&self.location),
            role: non_empty(&self.role),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Query parameters for `GET /archived-services`.
#[derive(Debug, Default, Deserialize)]
pub struct ArchivedServicesParams {
    #[serde(rename = "service-id")]
    pub service_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filter_from_strings() {
        let params = ListServicesParams {
            supplier_id: Some("1".into()),
            framework: Some("g-cloud-6, g-cloud-7".into()),
            status: Some("published,enabled".into()),
            lot: Some("SaaS".into()),
            location: Some(" ".into()),
            ..Default::default()
        };

        let filter = params.filter().unwrap();

        assert_eq!(filter.supplier_id, Some(SupplierId::new(1)));
        assert_eq!(
            filter.framework_slugs,
            Some(vec!["g-cloud-6".to_string(), "g-cloud-7".to_string()])
        );
        assert_eq!(filter.statuses, vec![ServiceStatus::Published, ServiceStatus::Enabled]);
        assert_eq!(filter.lot.as_deref(), Some("SaaS"));
        assert_eq!(filter.location, None);
    }

    #[test]
    fn rejects_non_integer_supplier_ids() {
        let params = ListServicesParams { supplier_id: Some("abc".into()), ..Default::default() };
        assert!(params.filter().is_err());
    }

    #[test]
    fn rejects_unknown_statuses() {
        let params = ListServicesParams { status: Some("published,bogus".into()), ..Default::default() };
        assert!(params.filter().is_err());
    }
}
