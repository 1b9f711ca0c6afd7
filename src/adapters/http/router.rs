//! Top-level router: every module's routes behind the token check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::ports::IsolationLevel;

use super::agreements::agreement_routes;
use super::audit::audit_routes;
use super::drafts::draft_routes;
use super::frameworks::framework_routes;
use super::middleware::{auth_middleware, AuthState};
use super::services::service_routes;
use super::state::AppState;
use super::suppliers::supplier_routes;

/// Builds the API. `/_status` is left open for load balancer checks.
pub fn api_router(state: AppState, auth: AuthState) -> Router {
    Router::new()
        .merge(framework_routes())
        .merge(supplier_routes())
        .merge(agreement_routes())
        .merge(service_routes())
        .merge(draft_routes())
        .merge(audit_routes())
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware))
        .route("/_status", get(status))
        .fallback(not_found)
        .with_state(state)
}

/// GET /_status
async fn status(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.begin(IsolationLevel::ReadCommitted).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!(error = %e, "Status check could not reach the store");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": "Error connecting to database" })),
            )
        }
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use secrecy::SecretString;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::application::handlers::fixtures::Fixture;

    const TOKEN: &str = "myToken";

    async fn app() -> Router {
        let fixture = Fixture::new().await;
        let state = AppState::new(
            fixture.store.clone(),
            fixture.validator.clone(),
            fixture.search.clone(),
            fixture.ids.clone(),
            100,
        );
        api_router(state, AuthState::new(vec![SecretString::new(TOKEN.to_string())]))
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn status_needs_no_token() {
        let response = app()
            .await
            .oneshot(Request::builder().uri("/_status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn api_routes_need_a_token() {
        let response = app()
            .await
            .oneshot(Request::builder().uri("/frameworks").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn lists_frameworks() {
        let response = app().await.oneshot(request("GET", "/frameworks", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["frameworks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn posting_to_the_service_collection_is_not_allowed() {
        let response = app()
            .await
            .oneshot(request("POST", "/services", Some(json!({"updated_by": "x"}))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_paths_are_json_404s() {
        let response = app().await.oneshot(request("GET", "/nothing-here", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Not found");
    }

    #[tokio::test]
    async fn mutations_need_updated_by() {
        let response = app()
            .await
            .oneshot(request("POST", "/suppliers", Some(json!({"suppliers": {"id": 2, "name": "B"}}))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Invalid JSON must have 'updated_by' key"
        );
    }

    #[tokio::test]
    async fn creates_and_fetches_a_supplier() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/suppliers",
                Some(json!({"updated_by": "joeblogs", "suppliers": {"id": 2, "name": "Supplier 2"}})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(request("GET", "/suppliers/2", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["suppliers"]["name"], "Supplier 2");
    }
}
