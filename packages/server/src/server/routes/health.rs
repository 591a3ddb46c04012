use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

use crate::server::app::AxumAppState;
use crate::server::error::ErrorResponse;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RauthHealthResponse {
    rauth_api_healthy: bool,
}

/// Liveness of this service (no upstream calls)
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// GET /api/rauth/health - liveness of the identity provider
///
/// Returns `{ rauthApiHealthy }` when the probe completes, 500 when it
/// fails or exceeds the upstream timeout.
pub async fn rauth_health_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<RauthHealthResponse>, (StatusCode, Json<ErrorResponse>)> {
    let probe = tokio::time::timeout(
        state.deps.upstream_timeout,
        state.deps.identity.check_api_health(),
    )
    .await;

    match probe {
        Ok(Ok(healthy)) => Ok(Json(RauthHealthResponse {
            rauth_api_healthy: healthy,
        })),
        Ok(Err(e)) => {
            warn!(error = %e, "Rauth health check failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Rauth health check failed")),
            ))
        }
        Err(_) => {
            warn!("Rauth health check timed out");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Rauth health check timed out")),
            ))
        }
    }
}
