// TestDependencies - mock implementations for testing
//
// Provides a mock identity provider that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rauth::RequestContext;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::BaseIdentityProvider;

// =============================================================================
// Mock Identity Provider
// =============================================================================

/// Calls received by the mock, in order
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    InitSession {
        phone: String,
        context: RequestContext,
    },
    VerifySession {
        session_token: String,
        user_phone: String,
    },
    IsSessionRevoked(String),
    CheckApiHealth,
}

pub struct MockIdentityProvider {
    verified: Arc<Mutex<HashSet<(String, String)>>>,
    revoked: Arc<Mutex<HashSet<String>>>,
    healthy: bool,
    failing: bool,
    delay: Option<Duration>,
    webhook_secret: String,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            verified: Arc::new(Mutex::new(HashSet::new())),
            revoked: Arc::new(Mutex::new(HashSet::new())),
            healthy: true,
            failing: false,
            delay: None,
            webhook_secret: "test_webhook_secret".to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mark `session_token` as having verified `user_phone`
    pub fn with_verified(self, session_token: &str, user_phone: &str) -> Self {
        self.verified
            .lock()
            .unwrap()
            .insert((session_token.to_string(), user_phone.to_string()));
        self
    }

    pub fn with_revoked(self, session_id: &str) -> Self {
        self.revoke(session_id);
        self
    }

    pub fn with_healthy(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// Every network operation fails as if the provider were unreachable
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Every network operation sleeps this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_webhook_secret(mut self, secret: &str) -> Self {
        self.webhook_secret = secret.to_string();
        self
    }

    /// Revoke a session after construction (e.g. between two requests)
    pub fn revoke(&self, session_id: &str) {
        self.revoked.lock().unwrap().insert(session_id.to_string());
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn revocation_checks(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ProviderCall::IsSessionRevoked(_)))
            .count()
    }

    async fn respond(&self, call: ProviderCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(anyhow!("identity provider unreachable"));
        }
        Ok(())
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityProvider for MockIdentityProvider {
    async fn init_session(
        &self,
        phone: &str,
        context: &RequestContext,
    ) -> Result<serde_json::Value> {
        self.respond(ProviderCall::InitSession {
            phone: phone.to_string(),
            context: context.clone(),
        })
        .await?;

        Ok(json!({
            "session_token": "sess_abc123",
            "phone": phone,
            "expires_in": 300,
        }))
    }

    async fn verify_session(&self, session_token: &str, user_phone: &str) -> Result<bool> {
        self.respond(ProviderCall::VerifySession {
            session_token: session_token.to_string(),
            user_phone: user_phone.to_string(),
        })
        .await?;

        Ok(self
            .verified
            .lock()
            .unwrap()
            .contains(&(session_token.to_string(), user_phone.to_string())))
    }

    async fn is_session_revoked(&self, session_id: &str) -> Result<bool> {
        self.respond(ProviderCall::IsSessionRevoked(session_id.to_string()))
            .await?;

        Ok(self.revoked.lock().unwrap().contains(session_id))
    }

    async fn check_api_health(&self) -> Result<bool> {
        self.respond(ProviderCall::CheckApiHealth).await?;
        Ok(self.healthy)
    }

    fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> Result<()> {
        Ok(rauth::verify_signature(
            self.webhook_secret.as_bytes(),
            body,
            signature,
        )?)
    }
}
