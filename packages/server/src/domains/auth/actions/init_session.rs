//! Start phone verification action

use rauth::RequestContext;
use tracing::{info, warn};

use crate::domains::auth::error::AuthError;
use crate::domains::auth::types::mask_phone;
use crate::kernel::ServerDeps;

/// Ask the identity provider to start verifying `phone` (OTP dispatch).
///
/// The provider's answer is returned as-is for the client.
pub async fn init_session(
    phone: &str,
    context: &RequestContext,
    deps: &ServerDeps,
) -> Result<serde_json::Value, AuthError> {
    if phone.trim().is_empty() {
        return Err(AuthError::BadRequest("phone is required".to_string()));
    }

    let result = tokio::time::timeout(
        deps.upstream_timeout,
        deps.identity.init_session(phone, context),
    )
    .await
    .map_err(|_| AuthError::UpstreamUnavailable("init_session timed out".to_string()))?;

    match result {
        Ok(init) => {
            info!(phone = %mask_phone(phone), "Verification session started");
            Ok(init)
        }
        Err(e) => {
            warn!(phone = %mask_phone(phone), error = %e, "Failed to start verification session");
            Err(AuthError::BadRequest(
                "Failed to start verification session".to_string(),
            ))
        }
    }
}
