//! Data source handlers

use axum::{extract::State, Json};

use crate::models::{CountResponse, HealthMetric};
use crate::{AppError, AppResult, AppState};

/// Number of documents in the health metrics collection
pub async fn count(State(state): State<AppState>) -> AppResult<Json<CountResponse>> {
    let pool = state
        .pool
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Database not configured".to_string()))?;

    let record_count = HealthMetric::count(pool, &state.config.collection_name).await?;
    Ok(Json(CountResponse { record_count }))
}
