//! Bearer token authentication for axum.
//!
//! Every API route sits behind `auth_middleware`. Callers present one of the
//! configured tokens:
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! A missing token is 401, an unknown one is 403. With no tokens configured
//! the check is disabled, which is only meant for local development.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// The accepted API tokens.
#[derive(Clone, Default)]
pub struct AuthState {
    tokens: Arc<Vec<SecretString>>,
}

impl AuthState {
    pub fn new(tokens: Vec<SecretString>) -> Self {
        Self { tokens: Arc::new(tokens) }
    }

    /// Accepts every request.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Compares against every configured token without short-circuiting.
    fn accepts(&self, presented: &str) -> bool {
        self.tokens.iter().fold(false, |found, token| {
            let matches: bool = token
                .expose_secret()
                .as_bytes()
                .ct_eq(presented.as_bytes())
                .into();
            found | matches
        })
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

fn rejection(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Rejects requests without a valid bearer token.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    if !auth.is_enabled() {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim);

    match token {
        None => rejection(
            StatusCode::UNAUTHORIZED,
            "Unauthorized; bearer token must be provided",
        ),
        Some(token) if auth.accepts(token) => next.run(request).await,
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with invalid token");
            rejection(StatusCode::FORBIDDEN, "Forbidden; invalid bearer token provided")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app(auth: AuthState) -> Router {
        Router::new()
            .route("/protected", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(auth, auth_middleware))
    }

    fn tokens() -> AuthState {
        AuthState::new(vec![
            SecretString::new("first-token".to_string()),
            SecretString::new("second-token".to_string()),
        ])
    }

    async fn status_for(auth: AuthState, header_value: Option<&str>) -> StatusCode {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app(auth)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        assert_eq!(status_for(tokens(), None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_token_is_forbidden() {
        assert_eq!(
            status_for(tokens(), Some("Bearer wrong-token")).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn any_configured_token_is_accepted() {
        assert_eq!(status_for(tokens(), Some("Bearer first-token")).await, StatusCode::OK);
        assert_eq!(status_for(tokens(), Some("Bearer second-token")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn disabled_auth_lets_everything_through() {
        assert_eq!(status_for(AuthState::disabled(), None).await, StatusCode::OK);
    }

    #[test]
    fn prefixes_of_a_token_are_rejected() {
        assert!(!tokens().accepts("first"));
        assert!(tokens().accepts("first-token"));
    }
}
