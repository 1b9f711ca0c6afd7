//! HTTP handlers for framework endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::JsonBody;
use crate::adapters::http::state::AppState;
use crate::application::handlers::frameworks::{
    CreateFrameworkCommand, GetFrameworkQuery, GetFrameworkStatsQuery,
    ListFrameworkSuppliersQuery, ListInterestedSuppliersQuery, UpdateFrameworkCommand,
};
use crate::domain::framework::Framework;

use super::dto::FrameworkSuppliersParams;

/// GET /frameworks
pub async fn list_frameworks(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let frameworks = state.list_frameworks_handler().handle().await?;
    let documents: Vec<Value> = frameworks.iter().map(Framework::to_document).collect();
    Ok(Json(json!({ "frameworks": documents })))
}

/// POST /frameworks
pub async fn create_framework(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = CreateFrameworkCommand {
        payload: body.object("frameworks")?,
    };

    let framework = state.create_framework_handler().handle(cmd, metadata).await?;

    Ok((StatusCode::CREATED, Json(json!({ "frameworks": framework.to_document() }))))
}

/// GET /frameworks/{slug}
pub async fn get_framework(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let framework = state.get_framework_handler().handle(GetFrameworkQuery { slug }).await?;
    Ok(Json(json!({ "frameworks": framework.to_document() })))
}

/// POST /frameworks/{slug}
pub async fn update_framework(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let payload = match body.payload.get("frameworks") {
        Some(Value::Object(map)) => map.clone(),
        None | Some(Value::Null) => Default::default(),
        Some(_) => return Err(ApiError::bad_request("Framework update expects a payload")),
    };

    let framework = state
        .update_framework_handler()
        .handle(UpdateFrameworkCommand { slug, payload }, metadata)
        .await?;

    Ok(Json(json!({ "frameworks": framework.to_document() })))
}

/// GET /frameworks/{slug}/stats
pub async fn get_framework_stats(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state
        .framework_stats_handler()
        .handle(GetFrameworkStatsQuery { slug })
        .await?;
    Ok(Json(stats))
}

/// GET /frameworks/{slug}/suppliers
pub async fn list_framework_suppliers(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<FrameworkSuppliersParams>,
) -> Result<impl IntoResponse, ApiError> {
    let with_declarations = params.with_declarations()?;
    let query = ListFrameworkSuppliersQuery {
        slug,
        agreement_returned: params.agreement_returned()?,
        statuses: params.statuses()?,
    };

    let rows = state.framework_suppliers_handler().handle(query).await?;

    let documents: Vec<Value> = rows.iter().map(|sf| sf.to_document(with_declarations)).collect();
    Ok(Json(json!({ "supplierFrameworks": documents })))
}

/// GET /frameworks/{slug}/interest
pub async fn list_interested_suppliers(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ids = state
        .interested_suppliers_handler()
        .handle(ListInterestedSuppliersQuery { slug })
        .await?;
    Ok(Json(json!({ "interestedSuppliers": ids })))
}
