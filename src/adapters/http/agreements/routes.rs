//! Axum router configuration for agreement endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    countersign_agreement, create_agreement, get_agreement, sign_agreement, update_agreement,
};

pub fn agreement_routes() -> Router<AppState> {
    Router::new()
        .route("/agreements", post(create_agreement))
        .route(
            "/agreements/:agreement_id",
            get(get_agreement).post(update_agreement),
        )
        .route("/agreements/:agreement_id/sign", post(sign_agreement))
        .route("/agreements/:agreement_id/countersign", post(countersign_agreement))
}
