use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::domains::auth::actions::verify_session_token;
use crate::domains::auth::{mask_phone, AuthError, VerifiedSession};
use crate::kernel::ServerDeps;

/// Authenticated user information from JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_phone: String,
    pub upstream_session_id: String,
}

impl From<VerifiedSession> for AuthUser {
    fn from(session: VerifiedSession) -> Self {
        Self {
            user_phone: session.user_phone,
            upstream_session_id: session.upstream_session_id,
        }
    }
}

/// JWT authentication middleware for protected routes
///
/// Verifies the Authorization header (signature, expiry, upstream revocation)
/// and adds AuthUser to request extensions. Any failure ends the request with
/// the matching error response.
pub async fn jwt_auth_middleware(
    deps: ServerDeps,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let session = verify_session_token(
        header.as_deref(),
        &deps.jwt_service,
        deps.identity.as_ref(),
        deps.upstream_timeout,
    )
    .await;

    match session {
        Ok(session) => {
            debug!(phone = %mask_phone(&session.user_phone), "Authenticated user");
            request.extensions_mut().insert(AuthUser::from(session));
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
