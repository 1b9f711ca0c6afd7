//! Axum router configuration for supplier endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    create_supplier, get_framework_interest, get_supplier, register_framework_interest,
    set_declaration, set_on_framework,
};

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", post(create_supplier))
        .route("/suppliers/:supplier_id", get(get_supplier))
        .route(
            "/suppliers/:supplier_id/frameworks/:slug",
            get(get_framework_interest)
                .put(register_framework_interest)
                .post(set_on_framework),
        )
        .route(
            "/suppliers/:supplier_id/frameworks/:slug/declaration",
            put(set_declaration),
        )
}
