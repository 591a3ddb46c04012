//! Login action - exchange a provider-verified session for a signed token

use tracing::{info, warn};

use crate::domains::auth::error::AuthError;
use crate::domains::auth::types::{mask_phone, VerifiedPhone};
use crate::kernel::ServerDeps;

/// Confirm the session/phone pairing with the identity provider, then issue a JWT.
///
/// The token is only signed once the provider has answered `true`; the
/// `session_token` is embedded unchanged as the upstream session id.
pub async fn login(
    session_token: &str,
    user_phone: &str,
    deps: &ServerDeps,
) -> Result<String, AuthError> {
    if session_token.trim().is_empty() {
        return Err(AuthError::BadRequest("sessionToken is required".to_string()));
    }
    if user_phone.trim().is_empty() {
        return Err(AuthError::BadRequest("userPhone is required".to_string()));
    }

    let verified = tokio::time::timeout(
        deps.upstream_timeout,
        deps.identity.verify_session(session_token, user_phone),
    )
    .await
    .map_err(|_| AuthError::UpstreamUnavailable("verify_session timed out".to_string()))?
    .map_err(|e| {
        warn!(phone = %mask_phone(user_phone), error = %e, "Session verification failed");
        AuthError::BadRequest("Failed to verify session".to_string())
    })?;

    if !verified {
        info!(phone = %mask_phone(user_phone), "Phone number not verified");
        return Err(AuthError::UnverifiedPhone);
    }

    let verified = VerifiedPhone::new(user_phone.to_string(), session_token.to_string());
    let token = deps.jwt_service.create_token(&verified)?;

    info!(phone = %mask_phone(user_phone), "Issued session token");
    Ok(token)
}
