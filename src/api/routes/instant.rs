//! Instant feed endpoint

use axum::{Json, extract::State};

use crate::api::{
    error::ApiResult,
    state::ApiState,
    types::{InstantPoint, InstantResponse},
};

/// GET /api/instant
///
/// Returns every sample still inside the retention window, oldest first
pub async fn list_instant(State(state): State<ApiState>) -> ApiResult<Json<InstantResponse>> {
    let samples = state.store.list_samples().await?;

    Ok(Json(InstantResponse {
        data: samples.iter().map(InstantPoint::from).collect(),
    }))
}
