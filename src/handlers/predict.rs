//! Scoring handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::logic::scorer::{score_batch, score_reading};
use crate::logic::{BatchScoringResult, ScoringResult};
use crate::models::{BatchReadings, SensorReading};
use crate::{AppResult, AppState};

/// Predict power consumption and flag a single reading
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<SensorReading>, JsonRejection>,
) -> AppResult<Json<ScoringResult>> {
    let Json(req) = payload?;
    let model = state.model.require()?;
    let result = score_reading(&model.pair, &req.to_reading())?;
    Ok(Json(result))
}

/// Score many readings against the same model snapshot
pub async fn predict_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchReadings>, JsonRejection>,
) -> AppResult<Json<BatchScoringResult>> {
    let Json(req) = payload?;
    req.validate()?;
    let model = state.model.require()?;
    let result = score_batch(&model.pair, &req.to_readings())?;

    tracing::debug!(
        "Batch of {} readings: {} anomalies",
        result.total_readings,
        result.anomalies_detected
    );
    Ok(Json(result))
}
