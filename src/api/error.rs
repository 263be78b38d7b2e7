//! API Errors

use crate::session::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Terminal request failures, each written straight to the response
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method Not Supported")]
    MethodNotAllowed,
    #[error("Please pass the data as URL form encoded")]
    BadRequest,
    #[error("Invalid Credentials")]
    InvalidCredentials,
    #[error("Forbidden")]
    Forbidden,
    #[error("session could not be saved: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Session(e) => {
                error!("Failed to persist session: {}", e);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}
