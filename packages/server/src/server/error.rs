//! Mapping of auth failures to HTTP responses.
//!
//! Every error body is `{ "error": "<short message>" }`; internal detail is
//! logged, never returned.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::domains::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UnverifiedPhone
            | AuthError::InvalidToken
            | AuthError::RevokedSession
            | AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client
    fn public_message(&self) -> String {
        match self {
            AuthError::UpstreamUnavailable(_) => "Identity provider unavailable".to_string(),
            AuthError::Configuration(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "Request failed");
        } else {
            warn!(code = self.code(), "Request rejected");
        }

        (status, Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}

const INVALID_BODY: &str = "Invalid request body";

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected request body");
        AuthError::BadRequest(INVALID_BODY.to_string())
    }
}
