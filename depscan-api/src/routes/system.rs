// ---------------------------------------------------------------------------
// System routes: health check
// ---------------------------------------------------------------------------

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check. Kept minimal so unauthenticated callers learn nothing
/// beyond liveness.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
