use axum::{body::Bytes, extract::Extension, http::HeaderMap, Json};
use rauth::{WebhookEvent, SIGNATURE_HEADER};
use serde::Serialize;
use tracing::{info, warn};

use crate::domains::auth::AuthError;
use crate::server::app::AxumAppState;

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /rauth/webhook - provider-pushed events
///
/// The raw body is authenticated with the shared webhook secret before it
/// is parsed. Events are acknowledged and logged; session truth stays with
/// the provider, so nothing is stored locally.
pub async fn webhook_handler(
    Extension(state): Extension<AxumAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AuthError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidSignature)?;

    state
        .deps
        .identity
        .verify_webhook_signature(&body, signature)
        .map_err(|e| {
            warn!(error = %e, "Rejected webhook");
            AuthError::InvalidSignature
        })?;

    let event: WebhookEvent = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Malformed webhook payload");
        AuthError::BadRequest("Invalid webhook payload".to_string())
    })?;

    info!(
        event_type = %event.event_type,
        session_id = event.session_id.as_deref().unwrap_or("-"),
        "Received Rauth webhook"
    );

    Ok(Json(WebhookAck { received: true }))
}
