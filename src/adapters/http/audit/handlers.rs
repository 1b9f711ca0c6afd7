//! HTTP handlers for audit endpoints.

use axum::extract::{OriginalUri, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::{page_links, JsonBody};
use crate::adapters::http::state::AppState;
use crate::application::handlers::audit::CreateAuditEventCommand;
use crate::domain::audit::AuditEvent;

use super::dto::ListAuditEventsParams;

/// GET /audit-events
pub async fn list_audit_events(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ListAuditEventsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.query(&state)?;

    let page = state.list_audit_events_handler().handle(query).await?;

    let events: Vec<Value> = page.items.iter().map(AuditEvent::to_document).collect();
    Ok(Json(json!({
        "auditEvents": events,
        "links": page_links(&uri, &page),
    })))
}

/// POST /audit-events
pub async fn create_audit_event(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateAuditEventCommand {
        payload: body.object("auditEvents")?,
    };

    let event = state.create_audit_event_handler().handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(json!({ "auditEvents": event.to_document() }))))
}
