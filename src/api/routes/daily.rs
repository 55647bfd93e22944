//! Daily rollup endpoint

use axum::{Json, extract::State};

use crate::api::{
    error::ApiResult,
    state::ApiState,
    types::{DailyPoint, DailyResponse},
};

/// GET /api/daily
pub async fn list_daily(State(state): State<ApiState>) -> ApiResult<Json<DailyResponse>> {
    let days = state.store.list_daily_aggregates().await?;

    Ok(Json(DailyResponse {
        data: days.iter().map(DailyPoint::from).collect(),
    }))
}
