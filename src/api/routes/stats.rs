//! Store statistics endpoint

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::api::{error::ApiResult, state::ApiState};

/// GET /api/stats
///
/// Returns row counts and the span of the instant feed
pub async fn get_stats(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let stats = state.store.get_stats().await?;

    Ok(Json(json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "storage": {
            "samples": stats.samples,
            "days": stats.days,
            "oldest_sample": stats.oldest_sample.map(|t| t.to_rfc3339()),
            "newest_sample": stats.newest_sample.map(|t| t.to_rfc3339()),
        },
    })))
}
