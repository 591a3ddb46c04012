use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Caller context forwarded to the provider when a session is started.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct InitSessionRequest<'a> {
    pub app_id: &'a str,
    pub phone: &'a str,
    pub webhook_url: &'a str,
    pub context: &'a RequestContext,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifySessionRequest<'a> {
    pub app_id: &'a str,
    pub session_token: &'a str,
    pub user_phone: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifySessionResponse {
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionStatusResponse {
    pub revoked: bool,
}

/// Event pushed by the provider to the webhook endpoint.
///
/// Only the envelope is typed; the payload is kept as raw JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}
