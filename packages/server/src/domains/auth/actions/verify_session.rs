//! Verify a presented session token

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domains::auth::error::AuthError;
use crate::domains::auth::jwt::JwtService;
use crate::domains::auth::types::{mask_phone, VerifiedSession};
use crate::kernel::BaseIdentityProvider;

/// Pull the token out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` (scheme matched case-insensitively) or a raw
/// token. Returns `None` when nothing usable is present.
pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let token = match value.get(..6) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case("bearer")
                && value[6..].chars().next().map_or(true, char::is_whitespace) =>
        {
            value[6..].trim()
        }
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Check signature and expiry locally, then ask the provider whether the
/// embedded upstream session has been revoked.
///
/// The provider is only consulted for tokens that pass the local checks.
/// A provider failure or a round-trip longer than `timeout` fails closed
/// with `UpstreamUnavailable`.
pub async fn verify_session_token(
    presented: Option<&str>,
    jwt_service: &JwtService,
    revocation: &dyn BaseIdentityProvider,
    timeout: Duration,
) -> Result<VerifiedSession, AuthError> {
    let token = extract_bearer(presented).ok_or_else(|| {
        debug!("No token presented");
        AuthError::InvalidToken
    })?;

    let claims = jwt_service.verify_token(token)?;

    let revoked = tokio::time::timeout(timeout, revocation.is_session_revoked(&claims.session_id))
        .await
        .map_err(|_| {
            warn!("Revocation check timed out");
            AuthError::UpstreamUnavailable("revocation check timed out".to_string())
        })?
        .map_err(|e| {
            warn!(error = %e, "Revocation check failed");
            AuthError::UpstreamUnavailable("revocation check failed".to_string())
        })?;

    if revoked {
        info!(phone = %mask_phone(&claims.user_phone), "Rejected token for revoked session");
        return Err(AuthError::RevokedSession);
    }

    Ok(VerifiedSession {
        user_phone: claims.user_phone,
        upstream_session_id: claims.session_id,
    })
}
