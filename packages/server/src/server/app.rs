//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use rauth::{RauthOptions, RauthService};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::{Config, REQUEST_TIMEOUT};
use crate::domains::auth::JwtService;
use crate::kernel::{RauthAdapter, ServerDeps};
use crate::server::middleware::{extract_client_ip, jwt_auth_middleware};
use crate::server::routes::{
    health_handler, login_handler, login_init_handler, protected_handler, rauth_health_handler,
    webhook_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: ServerDeps,
}

/// Build the production dependencies (Rauth client + JWT service) from configuration
pub fn build_deps(config: &Config) -> Result<ServerDeps> {
    let rauth_options = RauthOptions {
        api_key: config.rauth_api_key.clone(),
        app_id: config.rauth_app_id.clone(),
        webhook_secret: config.rauth_webhook_secret.clone(),
        webhook_url: config.rauth_webhook_url.clone(),
        base_url: config.rauth_api_url.clone(),
        timeout: config.rauth_timeout,
    };
    let rauth = Arc::new(RauthService::new(rauth_options).context("Failed to create Rauth client")?);

    let jwt_service = Arc::new(
        JwtService::new(&config.jwt_secret, config.jwt_issuer.clone(), config.jwt_ttl)
            .context("Invalid JWT configuration")?,
    );

    Ok(ServerDeps::new(
        Arc::new(RauthAdapter::new(rauth)),
        jwt_service,
        config.rauth_timeout,
    ))
}

/// Build the Axum application router
///
/// Login and health routes are public; `/api/protected` runs behind the JWT
/// middleware, which also consults the provider for revocation.
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let app_state = AxumAppState { deps: deps.clone() };

    // Clone deps for middleware closure
    let deps_for_middleware = deps;

    let protected = Router::new()
        .route("/protected", get(protected_handler))
        .route_layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(deps_for_middleware.clone(), req, next)
        }));

    let api = Router::new()
        .route("/login/init", post(login_init_handler))
        .route("/login", post(login_handler))
        .route("/rauth/health", get(rauth_health_handler))
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .route("/rauth/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(app_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
}

/// CORS configuration - any origin unless an allow-list is configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
