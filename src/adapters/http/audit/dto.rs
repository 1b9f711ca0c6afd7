//! Query parameters for audit endpoints.

use serde::Deserialize;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::page_number;
use crate::adapters::http::state::AppState;
use crate::application::handlers::audit::ListAuditEventsQuery;

/// Query parameters for `GET /audit-events`.
#[derive(Debug, Default, Deserialize)]
pub struct ListAuditEventsParams {
    #[serde(rename = "audit-type")]
    pub audit_type: Option<String>,
    #[serde(rename = "audit-date")]
    pub audit_date: Option<String>,
    #[serde(rename = "object-type")]
    pub object_type: Option<String>,
    #[serde(rename = "object-id")]
    pub object_id: Option<String>,
    pub latest_first: Option<String>,
    pub page: Option<String>,
}

impl ListAuditEventsParams {
    pub fn latest_first(&self) -> bool {
        matches!(
            self.latest_first.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("true") | Some("1")
        )
    }

    pub fn query(self, state: &AppState) -> Result<ListAuditEventsQuery, ApiError> {
        let page = state.page(page_number(self.page.as_deref())?);
        let latest_first = self.latest_first();
        Ok(ListAuditEventsQuery {
            audit_type: self.audit_type,
            audit_date: self.audit_date,
            object_type: self.object_type,
            object_id: self.object_id,
            latest_first,
            page,
        })
    }
}
