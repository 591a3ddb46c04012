use axum::Json;
use serde::Serialize;

use crate::server::middleware::AuthUser;

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: String,
}

/// GET /api/protected - requires a valid, unrevoked session token
pub async fn protected_handler(user: AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Protected route accessed".to_string(),
        user: user.user_phone,
    })
}
