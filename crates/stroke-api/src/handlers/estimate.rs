//! Per-analysis cost estimate.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use stroke_models::CostEstimate;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Largest frame count accepted by the estimator.
pub const MAX_ESTIMATE_FRAMES: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    pub frames: Option<u32>,
}

/// Estimate token usage and cost for one analysis.
pub async fn estimate_cost(
    State(state): State<AppState>,
    query: Result<Query<EstimateQuery>, QueryRejection>,
) -> ApiResult<Json<CostEstimate>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let frames = query
        .frames
        .unwrap_or(state.pipeline.frame_count() as u32);

    if !(1..=MAX_ESTIMATE_FRAMES).contains(&frames) {
        return Err(ApiError::bad_request(format!(
            "frames must be between 1 and {MAX_ESTIMATE_FRAMES}"
        )));
    }

    Ok(Json(CostEstimate::for_frames(frames)))
}
