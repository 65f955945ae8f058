//! Model lifecycle handlers (metrics, reload, retrain)

use std::sync::Arc;
use axum::{extract::State, Json};

use crate::config::TrainingSource;
use crate::logic::{dataset, Dataset, FeatureSchema, LoadedModel};
use crate::models::{HealthMetric, MetricsResponse, ModelActionResponse};
use crate::{AppError, AppResult, AppState};

/// Last evaluation of the installed model
pub async fn metrics(State(state): State<AppState>) -> AppResult<Json<MetricsResponse>> {
    let model = state.model.require()?;
    let metrics = model
        .metrics
        .ok_or_else(|| AppError::NotFound("Installed model has no evaluation metrics".to_string()))?;
    Ok(Json(metrics.into()))
}

/// Reload the artifact pair from disk and swap it in
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ModelActionResponse>> {
    let model = reload_from_disk(&state).await?;
    Ok(Json(ModelActionResponse {
        success: true,
        message: "Model reloaded successfully".to_string(),
        model_id: model.id,
        metrics: model.metrics,
    }))
}

/// Retrain from the configured source, persist, swap in
pub async fn train(State(state): State<AppState>) -> AppResult<Json<ModelActionResponse>> {
    let model = train_from_source(&state).await?;
    Ok(Json(ModelActionResponse {
        success: true,
        message: "Model trained successfully".to_string(),
        model_id: model.id,
        metrics: model.metrics,
    }))
}

// ============================================================================
// SHARED WITH STARTUP
// ============================================================================

pub async fn reload_from_disk(state: &AppState) -> AppResult<Arc<LoadedModel>> {
    let paths = state.config.artifact_paths();
    let _guard = state.artifact_lock.lock().await;
    let model = tokio::task::spawn_blocking(move || LoadedModel::load(&paths)).await??;
    Ok(state.model.install(model))
}

/// Train, persist and install under the artifact lock, so the pair on disk
/// is always the one that was installed last
pub async fn train_from_source(state: &AppState) -> AppResult<Arc<LoadedModel>> {
    let dataset = load_training_data(state).await?;
    let paths = state.config.artifact_paths();

    let _guard = state.artifact_lock.lock().await;
    let model = tokio::task::spawn_blocking(move || {
        LoadedModel::train(FeatureSchema::default(), dataset, &paths)
    })
    .await??;

    Ok(state.model.install(model))
}

async fn load_training_data(state: &AppState) -> AppResult<Dataset> {
    match state.config.training_source {
        TrainingSource::File => {
            let path = state.config.training_data_path.clone();
            Ok(tokio::task::spawn_blocking(move || dataset::load_json(&path)).await??)
        }
        TrainingSource::Database => {
            let pool = state.pool.as_ref().ok_or_else(|| {
                AppError::ServiceUnavailable("Database not configured".to_string())
            })?;
            Ok(HealthMetric::fetch_dataset(
                pool,
                &state.config.collection_name,
                state.config.training_filter.as_ref(),
            )
            .await?)
        }
    }
}
