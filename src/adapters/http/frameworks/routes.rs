//! Axum router configuration for framework endpoints.

use axum::routing::get;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    create_framework, get_framework, get_framework_stats, list_framework_suppliers,
    list_frameworks, list_interested_suppliers, update_framework,
};

pub fn framework_routes() -> Router<AppState> {
    Router::new()
        .route("/frameworks", get(list_frameworks).post(create_framework))
        .route("/frameworks/:slug", get(get_framework).post(update_framework))
        .route("/frameworks/:slug/stats", get(get_framework_stats))
        .route("/frameworks/:slug/suppliers", get(list_framework_suppliers))
        .route("/frameworks/:slug/interest", get(list_interested_suppliers))
}
