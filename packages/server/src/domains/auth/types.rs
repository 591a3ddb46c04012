use serde::Serialize;

/// A phone number the identity provider has confirmed for an upstream session.
///
/// Only the login flow (after `verify_session` succeeds) can construct one,
/// so the token issuer is unreachable for self-asserted identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPhone {
    user_phone: String,
    upstream_session_id: String,
}

impl VerifiedPhone {
    pub(crate) fn new(user_phone: String, upstream_session_id: String) -> Self {
        Self {
            user_phone,
            upstream_session_id,
        }
    }

    pub fn user_phone(&self) -> &str {
        &self.user_phone
    }

    pub fn upstream_session_id(&self) -> &str {
        &self.upstream_session_id
    }
}

/// Identity extracted from a token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedSession {
    pub user_phone: String,
    pub upstream_session_id: String,
}

/// Mask a phone number for logging, keeping the last four characters.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
