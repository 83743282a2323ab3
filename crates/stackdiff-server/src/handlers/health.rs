use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness check. Does not touch the store or the source-control host.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
