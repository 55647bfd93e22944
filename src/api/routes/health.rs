//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode};

use crate::api::{state::ApiState, types::HealthResponse};
use crate::storage::HealthStatus;

/// GET /api/health
///
/// Answers 503 when the store is unhealthy or cannot be asked
pub async fn health_check(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let health = state
        .store
        .health_check()
        .await
        .unwrap_or_else(|e| HealthStatus {
            healthy: false,
            message: e.to_string(),
            metadata: Default::default(),
        });

    let code = if health.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(HealthResponse::from_health(&health)))
}
