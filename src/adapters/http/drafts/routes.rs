//! Axum router configuration for draft endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    complete_draft, copy_draft, copy_service_to_draft, create_draft, delete_draft, get_draft,
    list_drafts, publish_draft, update_draft, update_draft_status,
};

pub fn draft_routes() -> Router<AppState> {
    Router::new()
        .route("/draft-services", get(list_drafts).post(create_draft))
        .route("/draft-services/copy-from/:service_id", put(copy_service_to_draft))
        .route(
            "/draft-services/:draft_id",
            get(get_draft).post(update_draft).delete(delete_draft),
        )
        .route("/draft-services/:draft_id/copy", post(copy_draft))
        .route("/draft-services/:draft_id/complete", post(complete_draft))
        .route("/draft-services/:draft_id/update-status", post(update_draft_status))
        .route("/draft-services/:draft_id/publish", post(publish_draft))
}
