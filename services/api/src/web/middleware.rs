//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use crate::web::rest::{fail, ApiFailure};
use crate::web::state::AppState;

/// The authenticated user's id, inserted into request extensions by
/// `require_auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i32);

/// Extracts the session token from a request's Cookie header.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
}

/// Resolves the session cookie in `headers` to the authenticated user.
///
/// Rejections carry the same `{"message": ...}` envelope the handlers use.
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<CurrentUser, ApiFailure> {
    let token = session_token(headers)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Authentication required"))?;

    let user_id = state
        .store
        .validate_auth_session(token)
        .await
        .map_err(|e| {
            error!("Failed to validate auth session: {:?}", e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        })?
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Authentication required"))?;

    Ok(CurrentUser(user_id))
}

/// Middleware that validates the auth session cookie and extracts the user id.
///
/// If valid, inserts a `CurrentUser` into request extensions for handlers to use.
/// If invalid, missing, or expired, returns 401 with a JSON message body.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiFailure> {
    let current_user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemStorage;
    use crate::config::Config;
    use axum::{body::Body, http::HeaderValue, middleware::from_fn_with_state, routing::get, Router};
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let config = Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: tracing::Level::INFO,
            allowed_origin: "http://localhost:5173".to_string(),
            session_ttl_days: 30,
            openai_api_key: None,
            translate_model: "gpt-4o".to_string(),
            translation_cache_ttl: std::time::Duration::from_secs(3600),
            translation_cache_capacity: 256,
        };
        Arc::new(AppState {
            store: Arc::new(MemStorage::unseeded()),
            config: Arc::new(config),
            translator: None,
        })
    }

    #[test]
    fn session_token_parses_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; lang=en"),
        );
        assert_eq!(session_token(&headers), Some("abc-123"));
    }

    #[test]
    fn session_token_is_none_without_cookie() {
        let headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&headers), None);
    }

    #[tokio::test]
    async fn missing_and_invalid_sessions_reject_with_message() {
        let state = test_state();

        let err = authenticate(&state, &HeaderMap::new()).await.err().unwrap();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
        assert_eq!(err.1.message, "Authentication required");

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session=bogus"));
        let err = authenticate(&state, &headers).await.err().unwrap();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
        assert_eq!(err.1.message, "Authentication required");
    }

    #[tokio::test]
    async fn unauthenticated_request_gets_json_message_body() {
        let state = test_state();
        let app = Router::new()
            .route("/api/favorites", get(crate::web::rest::list_favorites_handler))
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/favorites")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Authentication required");
    }
}
