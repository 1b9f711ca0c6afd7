//! HTTP handlers for draft endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::{service_id, JsonBody};
use crate::adapters::http::state::AppState;
use crate::application::handlers::drafts::{
    CompleteDraftCommand, CopyDraftCommand, CopyServiceToDraftCommand, CreateDraftCommand,
    DeleteDraftCommand, GetDraftQuery, PublishDraftCommand, UpdateDraftCommand,
    UpdateDraftStatusCommand,
};
use crate::domain::foundation::DraftId;
use crate::domain::service::DraftService;

use super::dto::{requested_status, ListDraftsParams};

fn draft_response(draft: &DraftService) -> Json<Value> {
    Json(json!({ "services": draft.to_document() }))
}

/// GET /draft-services
pub async fn list_drafts(
    State(state): State<AppState>,
    Query(params): Query<ListDraftsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let drafts = state.list_drafts_handler().handle(params.query()?).await?;

    let services: Vec<Value> = drafts.iter().map(DraftService::to_document).collect();
    Ok(Json(json!({ "services": services, "links": {} })))
}

/// POST /draft-services
pub async fn create_draft(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = CreateDraftCommand {
        services: body.object("services")?,
        page_questions: body.page_questions(),
    };

    let draft = state.create_draft_handler().handle(cmd, metadata).await?;

    Ok((StatusCode::CREATED, draft_response(&draft)))
}

/// PUT /draft-services/copy-from/{service_id}
pub async fn copy_service_to_draft(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let service_id = service_id(&raw_id)?;
    let metadata = body.metadata()?;

    let draft = state
        .copy_service_to_draft_handler()
        .handle(CopyServiceToDraftCommand { service_id }, metadata)
        .await?;

    Ok((StatusCode::CREATED, draft_response(&draft)))
}

/// GET /draft-services/{id}
pub async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.get_draft_handler().handle(GetDraftQuery { draft_id }).await?;

    Ok(Json(json!({
        "services": view.draft.to_document(),
        "auditEvents": view.latest_audit_event.map(|e| e.to_document()),
        "validationErrors": view.validation_errors.to_json(),
    })))
}

/// POST /draft-services/{id}
pub async fn update_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = UpdateDraftCommand {
        draft_id,
        update: body.object("services")?,
        page_questions: body.page_questions(),
    };

    let draft = state.update_draft_handler().handle(cmd, metadata).await?;

    Ok(draft_response(&draft))
}

/// DELETE /draft-services/{id}
pub async fn delete_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;

    state
        .delete_draft_handler()
        .handle(DeleteDraftCommand { draft_id }, metadata)
        .await?;

    Ok(Json(json!({ "message": "done" })))
}

/// POST /draft-services/{id}/copy
pub async fn copy_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;

    let draft = state
        .copy_draft_handler()
        .handle(CopyDraftCommand { draft_id }, metadata)
        .await?;

    Ok((StatusCode::CREATED, draft_response(&draft)))
}

/// POST /draft-services/{id}/complete
pub async fn complete_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;

    let draft = state
        .complete_draft_handler()
        .handle(CompleteDraftCommand { draft_id }, metadata)
        .await?;

    Ok(draft_response(&draft))
}

/// POST /draft-services/{id}/update-status
pub async fn update_draft_status(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let status = requested_status(&body)?;

    let draft = state
        .update_draft_status_handler()
        .handle(UpdateDraftStatusCommand { draft_id, status }, metadata)
        .await?;

    Ok(draft_response(&draft))
}

/// POST /draft-services/{id}/publish
pub async fn publish_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;

    let service = state
        .publish_draft_handler()
        .handle(PublishDraftCommand { draft_id }, metadata)
        .await?;

    Ok(Json(json!({ "services": service.to_document() })))
}
