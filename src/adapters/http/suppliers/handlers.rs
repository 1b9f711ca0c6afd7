//! HTTP handlers for supplier endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::JsonBody;
use crate::adapters::http::state::AppState;
use crate::application::handlers::suppliers::{
    CreateSupplierCommand, GetInterestQuery, GetSupplierQuery, RegisterInterestCommand,
    SetDeclarationCommand, SetOnFrameworkCommand,
};
use crate::domain::foundation::SupplierId;

/// POST /suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = CreateSupplierCommand {
        payload: body.object("suppliers")?,
    };

    let supplier = state.create_supplier_handler().handle(cmd, metadata).await?;

    Ok((StatusCode::CREATED, Json(json!({ "suppliers": supplier.to_document() }))))
}

/// GET /suppliers/{id}
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<SupplierId>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state
        .get_supplier_handler()
        .handle(GetSupplierQuery { supplier_id })
        .await?;
    Ok(Json(json!({ "suppliers": supplier.to_document() })))
}

/// GET /suppliers/{id}/frameworks/{slug}
pub async fn get_framework_interest(
    State(state): State<AppState>,
    Path((supplier_id, framework_slug)): Path<(SupplierId, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let interest = state
        .get_interest_handler()
        .handle(GetInterestQuery { supplier_id, framework_slug })
        .await?;
    Ok(Json(json!({ "frameworkInterest": interest.to_document(true) })))
}

/// PUT /suppliers/{id}/frameworks/{slug}
pub async fn register_framework_interest(
    State(state): State<AppState>,
    Path((supplier_id, framework_slug)): Path<(SupplierId, String)>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;

    let result = state
        .register_interest_handler()
        .handle(RegisterInterestCommand { supplier_id, framework_slug }, metadata)
        .await?;

    let status = if result.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status,
        Json(json!({ "frameworkInterest": result.supplier_framework.to_document(true) })),
    ))
}

/// POST /suppliers/{id}/frameworks/{slug}
pub async fn set_on_framework(
    State(state): State<AppState>,
    Path((supplier_id, framework_slug)): Path<(SupplierId, String)>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = SetOnFrameworkCommand {
        supplier_id,
        framework_slug,
        payload: body.object("frameworkInterest")?,
    };

    let interest = state.set_on_framework_handler().handle(cmd, metadata).await?;

    Ok(Json(json!({ "frameworkInterest": interest.to_document(true) })))
}

/// PUT /suppliers/{id}/frameworks/{slug}/declaration
pub async fn set_declaration(
    State(state): State<AppState>,
    Path((supplier_id, framework_slug)): Path<(SupplierId, String)>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = SetDeclarationCommand {
        supplier_id,
        framework_slug,
        declaration: body.object("declaration")?,
    };

    let interest = state.set_declaration_handler().handle(cmd, metadata).await?;

    Ok(Json(json!({ "declaration": interest.declaration })))
}
