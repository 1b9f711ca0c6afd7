//! Query parameters and body readers for draft endpoints.

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::{service_id, JsonBody};
use crate::application::handlers::drafts::ListDraftsQuery;
use crate::domain::foundation::SupplierId;

/// Query parameters for `GET /draft-services`.
#[derive(Debug, Default, Deserialize)]
pub struct ListDraftsParams {
    pub supplier_id: Option<String>,
    pub framework: Option<String>,
    pub service_id: Option<String>,
}

impl ListDraftsParams {
    pub fn query(&self) -> Result<ListDraftsQuery, ApiError> {
        let supplier_id = self
            .supplier_id
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("Invalid supplier_id: None"))?;
        let supplier_id = supplier_id
            .trim()
            .parse::<SupplierId>()
            .map_err(|_| ApiError::bad_request(format!("Invalid supplier_id: {}", supplier_id)))?;

        let service_id = match self.service_id.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(service_id(raw.trim())?),
            _ => None,
        };

        Ok(ListDraftsQuery {
            supplier_id,
            framework: self.framework.clone().filter(|f| !f.trim().is_empty()),
            service_id,
        })
    }
}

/// The `status` value from `services{status}`.
pub fn requested_status(body: &JsonBody) -> Result<String, ApiError> {
    body.object("services")?
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("Invalid JSON must have 'status' key"))
}
