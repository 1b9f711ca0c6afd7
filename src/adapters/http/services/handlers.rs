//! HTTP handlers for service endpoints.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::{page_links, page_number, service_id, JsonBody};
use crate::adapters::http::state::AppState;
use crate::application::handlers::services::{
    GetArchivedServiceQuery, GetServiceQuery, ImportServiceCommand, ListArchivedServicesQuery,
    ListServicesQuery, UpdateServiceCommand, UpdateServiceStatusCommand,
};
use crate::domain::foundation::ArchivedServiceId;
use crate::domain::service::{ArchivedService, Service};

use super::dto::{ArchivedServicesParams, ListServicesParams};

/// GET /services
pub async fn list_services(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ListServicesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListServicesQuery {
        filter: params.filter()?,
        page: state.page(page_number(params.page.as_deref())?),
    };

    let page = state.list_services_handler().handle(query).await?;

    let services: Vec<Value> = page.items.iter().map(Service::to_document).collect();
    Ok(Json(json!({
        "services": services,
        "links": page_links(&uri, &page),
    })))
}

/// GET /services/{id}
pub async fn get_service(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .get_service_handler()
        .handle(GetServiceQuery { service_id: service_id(&raw_id)? })
        .await?;

    Ok(Json(json!({
        "services": view.service.to_document(),
        "serviceMadeUnavailableAuditEvent": view.made_unavailable_by.map(|e| e.to_document()),
    })))
}

/// PUT /services/{id}
pub async fn import_service(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = ImportServiceCommand {
        service_id: raw_id,
        services: body.object("services")?,
    };

    let service = state.import_service_handler().handle(cmd, metadata).await?;

    Ok((StatusCode::CREATED, Json(json!({ "services": service.to_document() }))))
}

/// POST /services/{id}
pub async fn update_service(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let service_id = service_id(&raw_id)?;
    let metadata = body.metadata()?;
    let cmd = UpdateServiceCommand {
        service_id,
        update: body.object("services")?,
    };

    let service = state.update_service_handler().handle(cmd, metadata).await?;

    Ok(Json(json!({ "services": service.to_document() })))
}

/// POST /services/{id}/status/{status}
pub async fn update_service_status(
    State(state): State<AppState>,
    Path((raw_id, status)): Path<(String, String)>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let service_id = service_id(&raw_id)?;
    let metadata = body.metadata()?;

    let service = state
        .update_service_status_handler()
        .handle(UpdateServiceStatusCommand { service_id, status }, metadata)
        .await?;

    Ok(Json(json!({ "services": service.to_document() })))
}

/// GET /archived-services?service-id=
pub async fn list_archived_services(
    State(state): State<AppState>,
    Query(params): Query<ArchivedServicesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let raw_id = params
        .service_id
        .ok_or_else(|| ApiError::bad_request("Invalid service ID supplied"))?;

    let archived = state
        .list_archived_services_handler()
        .handle(ListArchivedServicesQuery { service_id: service_id(&raw_id)? })
        .await?;

    let services: Vec<Value> = archived.iter().map(ArchivedService::to_document).collect();
    Ok(Json(json!({ "services": services })))
}

/// GET /archived-services/{id}
pub async fn get_archived_service(
    State(state): State<AppState>,
    Path(archived_id): Path<ArchivedServiceId>,
) -> Result<impl IntoResponse, ApiError> {
    let archived = state
        .get_archived_service_handler()
        .handle(GetArchivedServiceQuery { archived_id })
        .await?;
    Ok(Json(json!({ "services": archived.to_document() })))
}
