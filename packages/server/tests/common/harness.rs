//! Test harness that wires the full router to a mock identity provider.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use server_core::domains::auth::JwtService;
use server_core::kernel::{MockIdentityProvider, ServerDeps};
use server_core::server::build_app;
use test_context::AsyncTestContext;
use tower::ServiceExt;

pub const TEST_PHONE: &str = "+15551234567";
pub const TEST_SESSION: &str = "sess_abc123";
pub const TEST_WEBHOOK_SECRET: &str = "test_webhook_secret";

/// Test harness that manages test infrastructure.
///
/// The default provider has verified `TEST_SESSION` for `TEST_PHONE`.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.get("/health", None).await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub provider: Arc<MockIdentityProvider>,
    pub jwt_service: Arc<JwtService>,
    pub app: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::with_provider(MockIdentityProvider::new().with_verified(TEST_SESSION, TEST_PHONE))
    }

    async fn teardown(self) {}
}

impl TestHarness {
    pub fn with_provider(provider: MockIdentityProvider) -> Self {
        Self::with_signing_secret(provider, "integration_test_secret")
    }

    /// Harness whose tokens are signed with `secret` (a separate deployment).
    pub fn with_signing_secret(provider: MockIdentityProvider, secret: &str) -> Self {
        // Uses try_init() to avoid panicking if already initialized.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let provider = Arc::new(provider.with_webhook_secret(TEST_WEBHOOK_SECRET));
        let jwt_service = Arc::new(
            JwtService::new(
                secret,
                "test_issuer".to_string(),
                chrono::Duration::hours(1),
            )
            .expect("valid JWT configuration"),
        );

        let deps = ServerDeps::new(provider.clone(), jwt_service.clone(), Duration::from_secs(2));
        let app = build_app(deps, &[]);

        Self {
            provider,
            jwt_service,
            app,
        }
    }

    /// Send a request through the router and decode the JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, body)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Log in through the HTTP surface and return the issued token.
    pub async fn login(&self) -> String {
        let (status, body) = self
            .post_json(
                "/api/login",
                serde_json::json!({ "sessionToken": TEST_SESSION, "userPhone": TEST_PHONE }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["jwtToken"]
            .as_str()
            .expect("jwtToken in login response")
            .to_string()
    }
}
