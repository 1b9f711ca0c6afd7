//! Axum router configuration for audit endpoints.

use axum::routing::get;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{create_audit_event, list_audit_events};

pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/audit-events", get(list_audit_events).post(create_audit_event))
}
