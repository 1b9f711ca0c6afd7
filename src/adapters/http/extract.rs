//! Request extraction helpers shared by every module.
//!
//! - `JsonBody` reads a JSON object body and the acting user
//! - `page_number` and `page_links` implement page-numbered listings

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap, Uri};
use serde_json::{json, Map, Value};

use crate::application::handlers::Paginated;
use crate::domain::foundation::{CommandMetadata, ServiceId};

use super::error::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// A request body that must be a JSON object.
#[derive(Debug, Clone)]
pub struct JsonBody {
    pub payload: Map<String, Value>,
    request_id: Option<String>,
}

impl JsonBody {
    /// The acting user from `updated_by`, tagged with the request id.
    pub fn metadata(&self) -> Result<CommandMetadata, ApiError> {
        let updated_by = self
            .payload
            .get("updated_by")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::bad_request("Invalid JSON must have 'updated_by' key"))?;
        let metadata = CommandMetadata::new(updated_by)?;
        Ok(match &self.request_id {
            Some(id) => metadata.with_correlation_id(id.clone()),
            None => metadata,
        })
    }

    /// A required nested object, such as `services` or `frameworks`.
    pub fn object(&self, key: &str) -> Result<Map<String, Value>, ApiError> {
        match self.payload.get(key) {
            Some(Value::Object(map)) => Ok(map.clone()),
            _ => Err(ApiError::bad_request(format!("Invalid JSON must have '{}' key", key))),
        }
    }

    /// The optional `page_questions` list.
    pub fn page_questions(&self) -> Option<Vec<String>> {
        self.payload.get("page_questions")?.as_array().map(|questions| {
            questions
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or("").trim() == "application/json")
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Err(ApiError::bad_request(
                "Unexpected Content-Type, expecting 'application/json'",
            ));
        }
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid JSON; could not read request body"))?;
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(payload)) => Ok(Self { payload, request_id }),
            _ => Err(ApiError::bad_request("Invalid JSON; must be a valid JSON object")),
        }
    }
}

/// Parses the `page` query argument. Defaults to the first page.
///
/// Only non-integers are rejected here; out of range numbers are left for
/// the listing to report as a missing page.
pub fn page_number(raw: Option<&str>) -> Result<i64, ApiError> {
    match raw {
        None => Ok(1),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ApiError::bad_request("Invalid page argument")),
    }
}

/// Parses a service id from a path or query argument.
pub fn service_id(raw: &str) -> Result<ServiceId, ApiError> {
    ServiceId::new(raw).map_err(|_| ApiError::bad_request("Invalid service ID supplied"))
}

/// Splits a comma list, dropping empty entries.
pub fn comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `next`/`prev`/`last` links for a page, keeping the other query arguments.
/// `last` is only given alongside `next`.
pub fn page_links<T>(uri: &Uri, page: &Paginated<T>) -> Value {
    let mut links = Map::new();
    if page.has_next {
        links.insert("next".into(), json!(page_url(uri, page.page + 1)));
        links.insert("last".into(), json!(page_url(uri, page.last_page)));
    }
    if page.has_prev() {
        links.insert("prev".into(), json!(page_url(uri, page.page - 1)));
    }
    Value::Object(links)
}

fn page_url(uri: &Uri, page: u64) -> String {
    let mut params: Vec<&str> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with("page="))
        .collect();
    let page_param = format!("page={}", page);
    params.push(&page_param);
    format!("{}?{}", uri.path(), params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn extract(req: Request) -> Result<JsonBody, ApiError> {
        JsonBody::from_request(req, &()).await
    }

    #[tokio::test]
    async fn rejects_non_json_content_type() {
        let err = extract(request(Some("text/plain"), "{}")).await.unwrap_err();
        assert!(format!("{:?}", err).contains("Unexpected Content-Type"));
    }

    #[tokio::test]
    async fn rejects_non_object_bodies() {
        let err = extract(request(Some("application/json"), "[1, 2]")).await.unwrap_err();
        assert!(format!("{:?}", err).contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn reads_updated_by_and_nested_objects() {
        let body = extract(request(
            Some("application/json; charset=utf-8"),
            r#"{"updated_by": "joeblogs", "services": {"serviceName": "x"}, "page_questions": ["serviceName"]}"#,
        ))
        .await
        .unwrap();

        assert_eq!(body.metadata().unwrap().updated_by, "joeblogs");
        assert_eq!(body.object("services").unwrap()["serviceName"], "x");
        assert_eq!(body.page_questions(), Some(vec!["serviceName".to_string()]));
        assert!(body.object("frameworks").is_err());
    }

    #[tokio::test]
    async fn missing_updated_by_is_rejected() {
        let body = extract(request(Some("application/json"), "{}")).await.unwrap();
        assert!(body.metadata().is_err());
    }

    #[test]
    fn page_numbers_must_be_integers() {
        assert_eq!(page_number(None).unwrap(), 1);
        assert_eq!(page_number(Some("3")).unwrap(), 3);
        assert_eq!(page_number(Some("-1")).unwrap(), -1);
        assert!(page_number(Some("three")).is_err());
        assert!(page_number(Some("1.5")).is_err());
    }

    #[test]
    fn links_keep_other_arguments() {
        let uri: Uri = "/services?framework=g-cloud-7&page=2".parse().unwrap();
        let page = Paginated { items: vec![1], page: 2, last_page: 4, has_next: true };

        let links = page_links(&uri, &page);

        assert_eq!(links["next"], "/services?framework=g-cloud-7&page=3");
        assert_eq!(links["prev"], "/services?framework=g-cloud-7&page=1");
        assert_eq!(links["last"], "/services?framework=g-cloud-7&page=4");
    }

    #[test]
    fn final_page_has_no_next_or_last() {
        let uri: Uri = "/audit-events?page=3".parse().unwrap();
        let page = Paginated { items: vec![1], page: 3, last_page: 3, has_next: false };

        let links = page_links(&uri, &page);

        assert!(links.get("next").is_none());
        assert!(links.get("last").is_none());
        assert_eq!(links["prev"], "/audit-events?page=2");
    }
}
