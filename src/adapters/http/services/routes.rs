//! Axum router configuration for service endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    get_archived_service, get_service, import_service, list_archived_services, list_services,
    update_service, update_service_status,
};

pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route(
            "/services/:service_id",
            get(get_service).put(import_service).post(update_service),
        )
        .route("/services/:service_id/status/:status", post(update_service_status))
        .route("/archived-services", get(list_archived_services))
        .route("/archived-services/:archived_id", get(get_archived_service))
}
