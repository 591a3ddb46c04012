// Minimal client for the Rauth phone verification API.

use std::fmt;
use std::time::Duration;

pub mod models;

use hmac::{Hmac, Mac};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use sha2::Sha256;
use tracing::{debug, warn};

use crate::models::{
    InitSessionRequest, SessionStatusResponse, VerifySessionRequest, VerifySessionResponse,
};
pub use crate::models::{RequestContext, WebhookEvent};

pub const DEFAULT_API_URL: &str = "https://api.rauth.io";

/// Header carrying the hex HMAC-SHA256 of a webhook body.
pub const SIGNATURE_HEADER: &str = "x-rauth-signature";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum RauthError {
    #[error("request to Rauth failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rauth returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("invalid Rauth response: {0}")]
    Decode(String),

    #[error("invalid Rauth base url: {0}")]
    InvalidBaseUrl(String),

    #[error("webhook signature mismatch")]
    InvalidSignature,
}

#[derive(Clone)]
pub struct RauthOptions {
    pub api_key: String,
    pub app_id: String,
    pub webhook_secret: String,
    pub webhook_url: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for RauthOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RauthOptions")
            .field("api_key", &"[redacted]")
            .field("app_id", &self.app_id)
            .field("webhook_secret", &"[redacted]")
            .field("webhook_url", &self.webhook_url)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RauthService {
    options: RauthOptions,
    client: Client,
}

impl RauthService {
    pub fn new(options: RauthOptions) -> Result<Self, RauthError> {
        Url::parse(&options.base_url).map_err(|e| RauthError::InvalidBaseUrl(e.to_string()))?;

        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self { options, client })
    }

    /// Start out-of-band verification for `phone`.
    ///
    /// The provider's response is returned untouched so callers can forward it.
    pub async fn init_session(
        &self,
        phone: &str,
        context: &RequestContext,
    ) -> Result<serde_json::Value, RauthError> {
        let url = self.endpoint(&["session", "init"])?;
        let body = InitSessionRequest {
            app_id: &self.options.app_id,
            phone,
            webhook_url: &self.options.webhook_url,
            context,
        };

        let response = self.authorized(self.client.post(url)).json(&body).send().await?;
        Self::decode(response).await
    }

    /// Ask the provider whether `session_token` verified `user_phone`.
    pub async fn verify_session(
        &self,
        session_token: &str,
        user_phone: &str,
    ) -> Result<bool, RauthError> {
        let url = self.endpoint(&["session", "verify"])?;
        let body = VerifySessionRequest {
            app_id: &self.options.app_id,
            session_token,
            user_phone,
        };

        let response = self.authorized(self.client.post(url)).json(&body).send().await?;
        let result: VerifySessionResponse = Self::decode(response).await?;
        Ok(result.verified)
    }

    /// Authoritative revocation status of an upstream session.
    pub async fn is_session_revoked(&self, session_id: &str) -> Result<bool, RauthError> {
        let url = self.endpoint(&["session", session_id, "status"])?;

        let response = self.authorized(self.client.get(url)).send().await?;
        let status: SessionStatusResponse = Self::decode(response).await?;
        Ok(status.revoked)
    }

    /// Liveness probe. A non-2xx answer means unhealthy, a transport failure is an error.
    pub async fn check_api_health(&self) -> Result<bool, RauthError> {
        let url = self.endpoint(&["health"])?;

        let response = self.authorized(self.client.get(url)).send().await?;
        let healthy = response.status().is_success();
        if !healthy {
            warn!(status = %response.status(), "Rauth health probe failed");
        }
        Ok(healthy)
    }

    /// Check a webhook body against its `x-rauth-signature` header value.
    ///
    /// Accepts a bare hex digest or one prefixed with `sha256=`.
    pub fn verify_webhook_signature(&self, body: &[u8], signature: &str) -> Result<(), RauthError> {
        verify_signature(self.options.webhook_secret.as_bytes(), body, signature)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RauthError> {
        let mut url = Url::parse(&self.options.base_url)
            .map_err(|e| RauthError::InvalidBaseUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| RauthError::InvalidBaseUrl(self.options.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.options.api_key)
            .header("X-App-Id", &self.options.app_id)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RauthError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Rauth returned an error");
            return Err(RauthError::Api { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            debug!(error = %e, "Failed to parse Rauth response");
            RauthError::Decode(e.to_string())
        })
    }
}

/// Sign `body` with `secret`, returning the lowercase hex digest.
pub fn sign_payload(secret: &[u8], body: &[u8]) -> Result<String, RauthError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| RauthError::InvalidSignature)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a hex HMAC-SHA256 signature.
pub fn verify_signature(secret: &[u8], body: &[u8], signature: &str) -> Result<(), RauthError> {
    let signature = signature.trim();
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);
    let expected = hex::decode(signature).map_err(|_| RauthError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| RauthError::InvalidSignature)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| RauthError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    fn options(base_url: String) -> RauthOptions {
        RauthOptions {
            api_key: "test_api_key".to_string(),
            app_id: "test_app".to_string(),
            webhook_secret: "whsec_test".to_string(),
            webhook_url: "https://example.org/rauth/webhook".to_string(),
            base_url,
            timeout: Duration::from_secs(2),
        }
    }

    /// Serve a fake provider on an ephemeral port and return its base url.
    async fn fake_provider() -> String {
        async fn init(headers: HeaderMap, Json(body): Json<Value>) -> (AxumStatus, Json<Value>) {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer test_api_key");
            if !authorized {
                return (AxumStatus::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
            }
            (
                AxumStatus::OK,
                Json(json!({
                    "session_token": "sess_abc123",
                    "phone": body["phone"],
                    "app_id": body["app_id"],
                    "ua": body["context"]["user_agent"],
                })),
            )
        }

        async fn verify(Json(body): Json<Value>) -> Json<Value> {
            let verified = body["session_token"] == "sess_abc123"
                && body["user_phone"] == "+15551234567";
            Json(json!({ "verified": verified }))
        }

        async fn status(Path(id): Path<String>) -> (AxumStatus, Json<Value>) {
            match id.as_str() {
                "sess_revoked" => (AxumStatus::OK, Json(json!({ "revoked": true }))),
                "sess_broken" => (AxumStatus::OK, Json(json!({ "unexpected": 1 }))),
                "sess_missing" => (AxumStatus::NOT_FOUND, Json(json!({ "error": "nope" }))),
                _ => (AxumStatus::OK, Json(json!({ "revoked": false }))),
            }
        }

        let app = Router::new()
            .route("/session/init", post(init))
            .route("/session/verify", post(verify))
            .route("/session/:id/status", get(status))
            .route("/health", get(|| async { "ok" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_init_session_forwards_context() {
        let service = RauthService::new(options(fake_provider().await)).unwrap();
        let context = RequestContext {
            ip: Some("10.0.0.1".to_string()),
            user_agent: Some("curl/8".to_string()),
            headers: Default::default(),
        };

        let result = service.init_session("+15551234567", &context).await.unwrap();
        assert_eq!(result["session_token"], "sess_abc123");
        assert_eq!(result["phone"], "+15551234567");
        assert_eq!(result["app_id"], "test_app");
        assert_eq!(result["ua"], "curl/8");
    }

    #[tokio::test]
    async fn test_wrong_api_key_is_api_error() {
        let mut opts = options(fake_provider().await);
        opts.api_key = "wrong".to_string();
        let service = RauthService::new(opts).unwrap();

        let err = service
            .init_session("+15551234567", &RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RauthError::Api { status, .. } if status == StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_verify_session() {
        let service = RauthService::new(options(fake_provider().await)).unwrap();

        assert!(service.verify_session("sess_abc123", "+15551234567").await.unwrap());
        assert!(!service.verify_session("sess_abc123", "+15550000000").await.unwrap());
    }

    #[tokio::test]
    async fn test_revocation_status() {
        let service = RauthService::new(options(fake_provider().await)).unwrap();

        assert!(!service.is_session_revoked("sess_abc123").await.unwrap());
        assert!(service.is_session_revoked("sess_revoked").await.unwrap());
        assert!(matches!(
            service.is_session_revoked("sess_broken").await,
            Err(RauthError::Decode(_))
        ));
        assert!(matches!(
            service.is_session_revoked("sess_missing").await,
            Err(RauthError::Api { .. })
        ));
    }

    #[tokio::test]
    async fn test_health_and_unreachable_provider() {
        let service = RauthService::new(options(fake_provider().await)).unwrap();
        assert!(service.check_api_health().await.unwrap());

        // Nothing listens on port 9 of the loopback interface.
        let down = RauthService::new(options("http://127.0.0.1:9".to_string())).unwrap();
        assert!(matches!(down.check_api_health().await, Err(RauthError::Http(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = RauthService::new(options("not a url".to_string()));
        assert!(matches!(result, Err(RauthError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_endpoint_escapes_session_id() {
        let service =
            RauthService::new(options("https://api.rauth.io/v1/".to_string())).unwrap();
        let url = service.endpoint(&["session", "a/b c", "status"]).unwrap();
        assert_eq!(url.as_str(), "https://api.rauth.io/v1/session/a%2Fb%20c/status");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let service = RauthService::new(options(DEFAULT_API_URL.to_string())).unwrap();
        let printed = format!("{:?}", service);

        assert!(!printed.contains("test_api_key"));
        assert!(!printed.contains("whsec_test"));
        assert!(printed.contains("test_app"));
    }

    #[test]
    fn test_webhook_signature() {
        let service = RauthService::new(options(DEFAULT_API_URL.to_string())).unwrap();
        let body = br#"{"type":"session.revoked","session_id":"sess_abc123"}"#;
        let signature = sign_payload(b"whsec_test", body).unwrap();

        assert!(service.verify_webhook_signature(body, &signature).is_ok());
        assert!(service
            .verify_webhook_signature(body, &format!("sha256={}", signature))
            .is_ok());
        assert!(matches!(
            service.verify_webhook_signature(b"tampered", &signature),
            Err(RauthError::InvalidSignature)
        ));
        assert!(matches!(
            service.verify_webhook_signature(body, "not-hex"),
            Err(RauthError::InvalidSignature)
        ));
        assert!(service
            .verify_webhook_signature(body, &sign_payload(b"other", body).unwrap())
            .is_err());
    }
}
