//! Request Handlers

use super::error::ApiError;
use super::form::{FormValues, LoginForm};
use crate::auth::{CredentialCheck, CredentialStore};
use crate::session::SessionStore;
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, info, warn};

pub const LOGIN_SUCCESS: &str = "Login successfully!";
pub const LOGOUT_SUCCESS: &str = "Logout Successful";
pub const WELCOME: &str = "Welcome!";

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(credentials: CredentialStore, sessions: SessionStore) -> Self {
        Self {
            credentials: Arc::new(credentials),
            sessions: Arc::new(sessions),
        }
    }
}

/// Reject anything but POST, independently of the route's method filter
pub fn ensure_post(method: &Method) -> Result<(), ApiError> {
    if *method == Method::POST {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed)
    }
}

/// Login handler.
///
/// An unregistered username gets an empty 200 with no cookie. A wrong
/// password gets 401 only; no success body follows it.
pub async fn login(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    cookies: Cookies,
    body: Bytes,
) -> Result<Response, ApiError> {
    ensure_post(&method)?;

    let values = FormValues::parse(&headers, query.as_deref(), &body).map_err(|e| {
        debug!("Rejected login input: {}", e);
        e
    })?;
    let form = LoginForm::from(&values);

    match state.credentials.check(&form.username, &form.password) {
        CredentialCheck::Valid => {
            let mut session = state.sessions.load(&cookies);
            session.set_authenticated(true);
            state.sessions.save(&cookies, &session)?;
            info!("Successful login for user '{}'", form.username);
            Ok(LOGIN_SUCCESS.into_response())
        }
        CredentialCheck::WrongPassword => {
            warn!("Failed login for user '{}': invalid password", form.username);
            Err(ApiError::InvalidCredentials)
        }
        CredentialCheck::UnknownUser => {
            warn!("Login attempt for unknown user '{}'", form.username);
            Ok(StatusCode::OK.into_response())
        }
    }
}

/// Logout handler
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<&'static str, ApiError> {
    let mut session = state.sessions.load(&cookies);
    session.set_authenticated(false);
    state.sessions.save(&cookies, &session)?;
    info!("Session logged out");
    Ok(LOGOUT_SUCCESS)
}

/// Healthcheck handler; read-only, never rewrites the cookie
pub async fn healthcheck(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<&'static str, ApiError> {
    if state.sessions.load(&cookies).is_authenticated() {
        Ok(WELCOME)
    } else {
        debug!("Healthcheck denied for unauthenticated session");
        Err(ApiError::Forbidden)
    }
}
