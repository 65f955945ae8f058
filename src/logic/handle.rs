//! Model Handle - process-wide, atomically swappable model
//!
//! Readers clone the `Arc` and drop the lock before scoring, so a reload
//! never exposes a half-updated pair to an in-flight request.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::logic::dataset::{Dataset, FeatureSchema};
use crate::logic::error::{ScorerError, ScorerResult};
use crate::logic::model::{load_artifacts, ArtifactPair, ArtifactPaths, EvaluationMetrics};
use crate::logic::scorer::AnomalyScorer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelOrigin {
    Trained,
    Loaded,
}

/// A ready pair plus what the service reports about it
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub id: Uuid,
    pub pair: ArtifactPair,
    pub metrics: Option<EvaluationMetrics>,
    pub origin: ModelOrigin,
    pub loaded_at: DateTime<Utc>,
}

/// Serializable summary for status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_id: Uuid,
    pub origin: ModelOrigin,
    pub features: Vec<String>,
    pub target: String,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedModel {
    /// Run the full training path and persist the result
    pub fn train(schema: FeatureSchema, dataset: Dataset, paths: &ArtifactPaths) -> ScorerResult<Self> {
        let mut scorer = AnomalyScorer::new(schema);
        scorer.fit_from(dataset)?;
        scorer.save(paths)?;

        let (id, pair, metrics) = scorer.take_model().ok_or(ScorerError::ModelNotReady)?;
        Ok(Self {
            id,
            pair,
            metrics,
            origin: ModelOrigin::Trained,
            loaded_at: Utc::now(),
        })
    }

    /// Read a persisted pair, skipping training entirely
    pub fn load(paths: &ArtifactPaths) -> ScorerResult<Self> {
        let stored = load_artifacts(paths)?;
        Ok(Self {
            id: stored.model_id,
            pair: stored.pair,
            metrics: stored.metrics,
            origin: ModelOrigin::Loaded,
            loaded_at: Utc::now(),
        })
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.id,
            origin: self.origin,
            features: self.pair.model().features().to_vec(),
            target: self.pair.target().to_string(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Empty until the first successful train or load
#[derive(Debug, Default)]
pub struct ModelHandle {
    current: RwLock<Option<Arc<LoadedModel>>>,
}

impl ModelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<LoadedModel>> {
        self.current.read().clone()
    }

    /// Current model or `ModelNotReady`
    pub fn require(&self) -> ScorerResult<Arc<LoadedModel>> {
        self.current().ok_or(ScorerError::ModelNotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Swap in a new model, returning it
    pub fn install(&self, model: LoadedModel) -> Arc<LoadedModel> {
        let model = Arc::new(model);
        let previous = self.current.write().replace(Arc::clone(&model));

        match previous {
            Some(old) => tracing::info!("Model {} replaced by {}", old.id, model.id),
            None => tracing::info!("Model {} installed", model.id),
        }
        model
    }
}
