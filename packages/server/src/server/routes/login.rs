use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{
        header::{AUTHORIZATION, COOKIE, USER_AGENT},
        HeaderMap,
    },
    Json,
};
use rauth::RequestContext;
use serde::{Deserialize, Serialize};

use crate::domains::auth::{actions, AuthError};
use crate::server::app::AxumAppState;
use crate::server::middleware::ClientIp;

#[derive(Debug, Deserialize)]
pub struct LoginInitRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub session_token: String,
    pub user_phone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub jwt_token: String,
}

/// POST /api/login/init - start phone verification
///
/// The provider's response is passed through unchanged.
pub async fn login_init_handler(
    Extension(state): Extension<AxumAppState>,
    client_ip: Option<Extension<ClientIp>>,
    headers: HeaderMap,
    payload: Result<Json<LoginInitRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AuthError> {
    let Json(body) = payload?;
    let context = request_context(&headers, client_ip.map(|Extension(ip)| ip));

    let init = actions::init_session(&body.phone, &context, &state.deps).await?;
    Ok(Json(init))
}

/// POST /api/login - exchange a verified provider session for a JWT
pub async fn login_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(body) = payload?;

    let jwt_token = actions::login(&body.session_token, &body.user_phone, &state.deps).await?;
    Ok(Json(LoginResponse { jwt_token }))
}

/// Request details forwarded to the provider. Credentials are never forwarded.
fn request_context(headers: &HeaderMap, client_ip: Option<ClientIp>) -> RequestContext {
    let forwarded = headers
        .iter()
        .filter(|(name, _)| *name != AUTHORIZATION && *name != COOKIE)
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    RequestContext {
        ip: client_ip.map(|ClientIp(ip)| ip.to_string()),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        headers: forwarded,
    }
}
