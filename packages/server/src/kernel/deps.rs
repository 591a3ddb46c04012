use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rauth::{RauthService, RequestContext};

use crate::domains::auth::JwtService;
use crate::kernel::BaseIdentityProvider;

// =============================================================================
// Adapters (wrap concrete clients to implement the kernel traits)
// =============================================================================

pub struct RauthAdapter(pub Arc<RauthService>);

impl RauthAdapter {
    pub fn new(service: Arc<RauthService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseIdentityProvider for RauthAdapter {
    async fn init_session(
        &self,
        phone: &str,
        context: &RequestContext,
    ) -> Result<serde_json::Value> {
        Ok(self.0.init_session(phone, context).await?)
    }

    async fn verify_session(&self, session_token: &str, user_phone: &str) -> Result<bool> {
        Ok(self.0.verify_session(session_token, user_phone).await?)
    }

    async fn is_session_revoked(&self, session_id: &str) -> Result<bool> {
        Ok(self.0.is_session_revoked(session_id).await?)
    }

    async fn check_api_health(&self) -> Result<bool> {
        Ok(self.0.check_api_health().await?)
    }

    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> Result<()> {
        Ok(self.0.verify_webhook_signature(body, signature)?)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies shared by every request (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub identity: Arc<dyn BaseIdentityProvider>,
    /// JWT service for token creation and verification
    pub jwt_service: Arc<JwtService>,
    /// Upper bound on any single round-trip to the identity provider
    pub upstream_timeout: std::time::Duration,
}

impl ServerDeps {
    pub fn new(
        identity: Arc<dyn BaseIdentityProvider>,
        jwt_service: Arc<JwtService>,
        upstream_timeout: std::time::Duration,
    ) -> Self {
        Self {
            identity,
            jwt_service,
            upstream_timeout,
        }
    }
}
