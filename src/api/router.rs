//! API Routes

use super::handlers::{healthcheck, login, logout, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Session authentication router
pub struct AuthApi;

impl AuthApi {
    /// Create the router.
    ///
    /// Each path accepts a single method; any other method on a known path
    /// is answered with 405 by the method router.
    pub fn create_router(state: AppState, write_timeout: Duration) -> Router {
        Router::new()
            .route("/login", post(login))
            .route("/logout", get(logout))
            .route("/healthcheck", get(healthcheck))
            .with_state(state)
            .layer(CookieManagerLayer::new())
            .layer(TimeoutLayer::new(write_timeout))
            .layer(TraceLayer::new_for_http())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialStore;
    use crate::session::SessionStore;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let state = AppState::new(
            CredentialStore::new([("user1", "password")]),
            SessionStore::new(b"test-secret", "session.id"),
        );
        AuthApi::create_router(state, Duration::from_secs(15))
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let request = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();

        let response = create_test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_login_rejects_get() {
        let request = Request::builder()
            .uri("/login")
            .body(Body::empty())
            .unwrap();

        let response = create_test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_logout_sets_cookie() {
        let request = Request::builder()
            .uri("/logout")
            .body(Body::empty())
            .unwrap();

        let response = create_test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }
}
