use thiserror::Error;

/// Failures of the login and session-verification flows.
///
/// `InvalidToken` intentionally covers every local token defect (bad
/// signature, malformed, expired, missing) so callers cannot tell them apart.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("Phone number not verified")]
    UnverifiedPhone,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Session revoked. Please log in again.")]
    RevokedSession,

    #[error("identity provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid webhook signature")]
    InvalidSignature,
}

impl AuthError {
    /// Short machine-readable code used in structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Configuration(_) => "configuration",
            AuthError::UnverifiedPhone => "unverified_phone",
            AuthError::InvalidToken => "invalid_token",
            AuthError::RevokedSession => "revoked_session",
            AuthError::UpstreamUnavailable(_) => "upstream_unavailable",
            AuthError::BadRequest(_) => "bad_request",
            AuthError::InvalidSignature => "invalid_signature",
        }
    }
}
