//! HTTP handlers for agreement endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Map, Value};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::extract::JsonBody;
use crate::adapters::http::state::AppState;
use crate::application::handlers::agreements::{
    CountersignAgreementCommand, CreateAgreementCommand, GetAgreementQuery,
    SignAgreementCommand, UpdateAgreementCommand,
};
use crate::domain::foundation::AgreementId;

use super::dto::{create_fields, optional_object, optional_string};

fn agreement_body(body: &JsonBody) -> Option<&Map<String, Value>> {
    body.payload.get("agreement").and_then(Value::as_object)
}

/// POST /agreements
pub async fn create_agreement(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let (supplier_id, framework_slug) = create_fields(&body.object("agreement")?)?;

    let agreement = state
        .create_agreement_handler()
        .handle(CreateAgreementCommand { supplier_id, framework_slug }, metadata)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "agreement": agreement.to_document() }))))
}

/// GET /agreements/{id}
pub async fn get_agreement(
    State(state): State<AppState>,
    Path(agreement_id): Path<AgreementId>,
) -> Result<impl IntoResponse, ApiError> {
    let agreement = state
        .get_agreement_handler()
        .handle(GetAgreementQuery { agreement_id })
        .await?;
    Ok(Json(json!({ "agreement": agreement.to_document() })))
}

/// POST /agreements/{id}
pub async fn update_agreement(
    State(state): State<AppState>,
    Path(agreement_id): Path<AgreementId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = UpdateAgreementCommand {
        agreement_id,
        update: body.object("agreement")?,
    };

    let agreement = state.update_agreement_handler().handle(cmd, metadata).await?;

    Ok(Json(json!({ "agreement": agreement.to_document() })))
}

/// POST /agreements/{id}/sign
pub async fn sign_agreement(
    State(state): State<AppState>,
    Path(agreement_id): Path<AgreementId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let cmd = SignAgreementCommand {
        agreement_id,
        signed_agreement_details: optional_object(
            agreement_body(&body),
            "signedAgreementDetails",
        )?,
    };

    let agreement = state.sign_agreement_handler().handle(cmd, metadata).await?;

    Ok(Json(json!({ "agreement": agreement.to_document() })))
}

/// POST /agreements/{id}/countersign
pub async fn countersign_agreement(
    State(state): State<AppState>,
    Path(agreement_id): Path<AgreementId>,
    body: JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    let metadata = body.metadata()?;
    let agreement = agreement_body(&body);
    let cmd = CountersignAgreementCommand {
        agreement_id,
        countersigned_agreement_details: optional_object(
            agreement,
            "countersignedAgreementDetails",
        )?,
        countersigned_agreement_path: optional_string(agreement, "countersignedAgreementPath")?,
    };

    let agreement = state.countersign_agreement_handler().handle(cmd, metadata).await?;

    Ok(Json(json!({ "agreement": agreement.to_document() })))
}
