//! Conveyor Belt Predictive Maintenance
//!
//! Predicts the power a conveyor belt should draw from its vibration,
//! temperature and speed, and flags readings that draw noticeably more.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CONVEYOR SCORER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌──────────────────────┐ │
//! │  │  REST API │  │ ModelHandle  │  │  AnomalyScorer       │ │
//! │  │  (Axum)   │─▶│ (Arc swap)   │◀─│  load → preprocess → │ │
//! │  │           │  │              │  │  train → evaluate    │ │
//! │  └─────┬─────┘  └──────────────┘  └──────────┬───────────┘ │
//! │        │                                     │             │
//! │        ▼                                     ▼             │
//! │  ┌─────────────┐                   ┌──────────────────┐    │
//! │  │ PostgreSQL  │                   │ model.json +     │    │
//! │  │ (JSONB docs)│                   │ scaler.json      │    │
//! │  └─────────────┘                   └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use std::sync::Arc;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};
use logic::ModelHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: Option<sqlx::PgPool>,
    pub config: config::Config,
    pub model: Arc<ModelHandle>,
    /// Serializes writers and readers of the artifact files
    pub artifact_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(config: config::Config, pool: Option<sqlx::PgPool>) -> Self {
        Self {
            pool,
            config,
            model: Arc::new(ModelHandle::new()),
            artifact_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let scoring_routes = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/predict/batch", post(handlers::predict::predict_batch));

    let model_routes = Router::new()
        .route("/metrics", get(handlers::model::metrics))
        .route("/model/reload", post(handlers::model::reload))
        .route("/model/train", post(handlers::model::train));

    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::check))
        .route("/data/count", get(handlers::data::count))
        .merge(scoring_routes)
        .merge(model_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
