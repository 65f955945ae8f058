//! Health check handler

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::logic::ModelInfo;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model: Option<ModelInfo>,
}

/// 200 once a model is installed, 503 before
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let model = state.model.current().map(|m| m.info());
    let (status, label) = if model.is_some() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "model not initialized")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: chrono::Utc::now().timestamp(),
            model,
        }),
    )
}

/// Service description
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Conveyor Belt Predictive Maintenance API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /health": "Service and model status",
            "POST /predict": "Predict power consumption for a single reading",
            "POST /predict/batch": "Predict for multiple readings",
            "GET /metrics": "Model performance metrics (MSE, R2)",
            "GET /data/count": "Record count of the health metrics collection",
            "POST /model/reload": "Reload model from disk",
            "POST /model/train": "Retrain from the configured source"
        }
    }))
}
