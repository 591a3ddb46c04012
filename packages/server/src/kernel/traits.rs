// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Login and session checks live in domains/auth and call through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseIdentityProvider)

use anyhow::Result;
use async_trait::async_trait;
use rauth::RequestContext;

// =============================================================================
// Identity Provider Trait (Infrastructure - phone verification)
// =============================================================================

#[async_trait]
pub trait BaseIdentityProvider: Send + Sync {
    /// Begin out-of-band verification (OTP dispatch) for a phone number.
    /// The provider's response is opaque and forwarded verbatim.
    async fn init_session(
        &self,
        phone: &str,
        context: &RequestContext,
    ) -> Result<serde_json::Value>;

    /// Confirm that an upstream session verified this phone number
    async fn verify_session(&self, session_token: &str, user_phone: &str) -> Result<bool>;

    /// Authoritative revocation check for an upstream session id
    async fn is_session_revoked(&self, session_id: &str) -> Result<bool>;

    /// Liveness probe of the provider API
    async fn check_api_health(&self) -> Result<bool>;

    /// Integrity check of a provider-pushed webhook body
    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> Result<()>;
}
