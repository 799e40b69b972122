//! Admin error types and HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use cybee_firebase::{AuthError, FirebaseError};

/// Top-level error for admin route handlers.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("backend error: {0}")]
    Firebase(#[from] FirebaseError),

    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Firebase(e) => {
                sentry::capture_error(e);
                tracing::error!(error = %e, "backend request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Store backend unavailable".to_owned(),
                )
            }
            Self::Auth(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            Self::Session(e) => {
                sentry::capture_error(e);
                tracing::error!(error = %e, "session store failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_owned(),
                )
            }
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {what}")),
            Self::BadRequest(why) => (StatusCode::BAD_REQUEST, why.clone()),
        };

        (status, message).into_response()
    }
}

/// Convenience alias for admin handlers.
pub type Result<T> = std::result::Result<T, AdminError>;
