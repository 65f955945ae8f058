//! Anomaly Scorer - load, preprocess, train, evaluate, persist, score
//!
//! Lifecycle:
//!
//! ```text
//! Uninitialized -> DataLoaded -> Preprocessed -> Trained -> Evaluated
//!        \______________ load_artifacts() ______________/ -> Ready
//! ```
//!
//! Scoring is valid from `Trained` onward. Loading new data starts a fresh
//! lifecycle and drops any previous model.

pub mod preprocess;
pub mod scoring;


use std::path::Path;
use uuid::Uuid;

use crate::logic::dataset::{self, Dataset, FeatureSchema, Reading};
use crate::logic::error::{ScorerError, ScorerResult};
use crate::logic::model::{
    self, mean_squared_error, r2_score, ArtifactPair, ArtifactPaths, EvaluationMetrics,
    LinearModel,
};

pub use preprocess::{preprocess, Preprocessed};
pub use scoring::{score_batch, score_reading, BatchScoringResult, IndexedScoringResult, ScoringResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerStage {
    Uninitialized,
    DataLoaded,
    Preprocessed,
    Trained,
    Evaluated,
    Ready,
}

impl ScorerStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerStage::Uninitialized => "uninitialized",
            ScorerStage::DataLoaded => "data_loaded",
            ScorerStage::Preprocessed => "preprocessed",
            ScorerStage::Trained => "trained",
            ScorerStage::Evaluated => "evaluated",
            ScorerStage::Ready => "ready",
        }
    }

    /// Whether a model + transform pair is available
    pub fn can_score(&self) -> bool {
        matches!(self, ScorerStage::Trained | ScorerStage::Evaluated | ScorerStage::Ready)
    }
}

impl std::fmt::Display for ScorerStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateful wrapper around the scoring workflow.
///
/// Not shared across threads; share the resulting pair through
/// `ModelHandle` instead of sharing the scorer.
#[derive(Debug)]
pub struct AnomalyScorer {
    schema: FeatureSchema,
    stage: ScorerStage,
    dataset: Option<Dataset>,
    prepared: Option<Preprocessed>,
    pair: Option<ArtifactPair>,
    model_id: Option<Uuid>,
    metrics: Option<EvaluationMetrics>,
}

impl Default for AnomalyScorer {
    fn default() -> Self {
        Self::new(FeatureSchema::default())
    }
}

impl AnomalyScorer {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            stage: ScorerStage::Uninitialized,
            dataset: None,
            prepared: None,
            pair: None,
            model_id: None,
            metrics: None,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn stage(&self) -> ScorerStage {
        self.stage
    }

    pub fn pair(&self) -> Option<&ArtifactPair> {
        self.pair.as_ref()
    }

    pub fn model_id(&self) -> Option<Uuid> {
        self.model_id
    }

    pub fn metrics(&self) -> Option<EvaluationMetrics> {
        self.metrics
    }

    pub fn prepared(&self) -> Option<&Preprocessed> {
        self.prepared.as_ref()
    }

    // ========================================================================
    // TRAINING PATH
    // ========================================================================

    /// Load a JSON array of records from disk
    pub fn load(&mut self, path: &Path) -> ScorerResult<usize> {
        let dataset = dataset::load_json(path)?;
        self.set_dataset(dataset)
    }

    /// Accept a dataset from any source (file, database query, caller)
    pub fn set_dataset(&mut self, dataset: Dataset) -> ScorerResult<usize> {
        if dataset.is_empty() {
            return Err(ScorerError::DataUnavailable("source contains no records".to_string()));
        }

        let len = dataset.len();
        self.dataset = Some(dataset);
        self.prepared = None;
        self.pair = None;
        self.model_id = None;
        self.metrics = None;
        self.stage = ScorerStage::DataLoaded;
        Ok(len)
    }

    pub fn preprocess(&mut self) -> ScorerResult<&Preprocessed> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(|| ScorerError::DataUnavailable("no data loaded".to_string()))?;

        let prepared = preprocess(dataset, &self.schema)?;
        self.pair = None;
        self.model_id = None;
        self.metrics = None;
        self.stage = ScorerStage::Preprocessed;
        Ok(self.prepared.insert(prepared))
    }

    /// Fit OLS on the scaled training partition
    pub fn train(&mut self) -> ScorerResult<&ArtifactPair> {
        let prepared = match (&self.prepared, self.stage) {
            (Some(prepared), ScorerStage::Preprocessed | ScorerStage::Trained | ScorerStage::Evaluated) => prepared,
            _ => return Err(self.violation("train")),
        };

        tracing::info!("Starting model training (linear regression, {} rows)", prepared.train.len());

        let model = LinearModel::fit(
            &prepared.train.features,
            &prepared.train.target,
            &self.schema.features,
            &self.schema.target,
        )?;
        let pair = ArtifactPair::new(model, prepared.transform.clone())?;

        self.model_id = Some(Uuid::new_v4());
        self.metrics = None;
        self.stage = ScorerStage::Trained;
        tracing::info!("Model training complete");
        Ok(self.pair.insert(pair))
    }

    /// MSE and R² on the held-out partition. Mutates nothing but the
    /// remembered metrics.
    pub fn evaluate(&mut self) -> ScorerResult<EvaluationMetrics> {
        let (pair, prepared) = match (&self.pair, &self.prepared, self.stage) {
            (Some(pair), Some(prepared), ScorerStage::Trained | ScorerStage::Evaluated) => (pair, prepared),
            _ => return Err(self.violation("evaluate")),
        };

        let metrics = evaluate(pair, prepared)?;
        tracing::info!("Model evaluation: MSE {:.4}, R2 {:.4}", metrics.mse, metrics.r2);

        self.metrics = Some(metrics);
        self.stage = ScorerStage::Evaluated;
        Ok(metrics)
    }

    /// preprocess -> train -> evaluate
    pub fn fit(&mut self) -> ScorerResult<EvaluationMetrics> {
        self.preprocess()?;
        self.train()?;
        self.evaluate()
    }

    /// Load `dataset` and run the whole training path on it
    pub fn fit_from(&mut self, dataset: Dataset) -> ScorerResult<EvaluationMetrics> {
        self.set_dataset(dataset)?;
        self.fit()
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    pub fn save(&self, paths: &ArtifactPaths) -> ScorerResult<Uuid> {
        let (pair, id) = match (&self.pair, self.model_id) {
            (Some(pair), Some(id)) => (pair, id),
            _ => return Err(ScorerError::ModelNotReady),
        };
        model::save_artifacts(pair, id, self.metrics, paths)?;
        Ok(id)
    }

    /// Enter `Ready` from any stage, bypassing training
    pub fn load_artifacts(&mut self, paths: &ArtifactPaths) -> ScorerResult<Uuid> {
        let stored = model::load_artifacts(paths)?;
        if stored.pair.model().features() != self.schema.features.as_slice()
            || stored.pair.target() != self.schema.target
        {
            return Err(ScorerError::FeatureMismatch(format!(
                "artifacts were trained on {:?} -> {}, scorer expects {:?} -> {}",
                stored.pair.model().features(),
                stored.pair.target(),
                self.schema.features,
                self.schema.target
            )));
        }

        self.dataset = None;
        self.prepared = None;
        self.pair = Some(stored.pair);
        self.model_id = Some(stored.model_id);
        self.metrics = stored.metrics;
        self.stage = ScorerStage::Ready;
        Ok(stored.model_id)
    }

    // ========================================================================
    // SCORING
    // ========================================================================

    pub fn score(&self, reading: &Reading) -> ScorerResult<ScoringResult> {
        score_reading(self.ready_pair()?, reading)
    }

    pub fn score_batch(&self, readings: &[Reading]) -> ScorerResult<BatchScoringResult> {
        score_batch(self.ready_pair()?, readings)
    }

    fn ready_pair(&self) -> ScorerResult<&ArtifactPair> {
        match &self.pair {
            Some(pair) if self.stage.can_score() => Ok(pair),
            _ => Err(ScorerError::ModelNotReady),
        }
    }

    /// Hand the trained or loaded state over, leaving the scorer empty
    pub fn take_model(&mut self) -> Option<(Uuid, ArtifactPair, Option<EvaluationMetrics>)> {
        if !self.stage.can_score() {
            return None;
        }
        let id = self.model_id.take()?;
        let pair = self.pair.take()?;
        let metrics = self.metrics.take();
        self.dataset = None;
        self.prepared = None;
        self.stage = ScorerStage::Uninitialized;
        Some((id, pair, metrics))
    }

    fn violation(&self, operation: &'static str) -> ScorerError {
        ScorerError::StageViolation {
            operation,
            stage: self.stage.as_str(),
        }
    }
}

/// Evaluate a pair against a held-out partition
pub fn evaluate(pair: &ArtifactPair, prepared: &Preprocessed) -> ScorerResult<EvaluationMetrics> {
    if prepared.test.is_empty() {
        return Err(ScorerError::InsufficientData(
            "held-out partition is empty".to_string(),
        ));
    }

    let predicted = pair.model().predict(&prepared.test.features);
    Ok(EvaluationMetrics {
        mse: mean_squared_error(&prepared.test.target, &predicted),
        r2: r2_score(&prepared.test.target, &predicted),
        train_rows: prepared.train.len(),
        test_rows: prepared.test.len(),
    })
}
