//! Model Module - scaling, regression, evaluation, persistence
//!
//! The fitted transform and the fitted model are only valid together, so
//! everything that predicts goes through `ArtifactPair`.

pub mod scaler;
pub mod regression;
pub mod split;
pub mod metrics;
pub mod threshold;
pub mod artifacts;

#[cfg(test)]
mod tests;

pub use scaler::{FeatureScale, ScalingTransform};
pub use regression::LinearModel;
pub use split::{train_test_split, Partition, SPLIT_SEED, TEST_PERCENT};
pub use metrics::{mean_squared_error, r2_score, EvaluationMetrics};
pub use threshold::{is_anomalous, residual, RESIDUAL_THRESHOLD};
pub use artifacts::{load_artifacts, save_artifacts, ArtifactPaths, StoredArtifacts};

use crate::logic::dataset::Reading;
use crate::logic::error::{ScorerError, ScorerResult};

/// Fitted model bound to the transform it was trained behind
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPair {
    model: LinearModel,
    transform: ScalingTransform,
}

impl ArtifactPair {
    /// Rejects a model and transform that disagree on feature names or order
    pub fn new(model: LinearModel, transform: ScalingTransform) -> ScorerResult<Self> {
        let transform_names = transform.feature_names();
        if model.features() != transform_names.as_slice() {
            return Err(ScorerError::FeatureMismatch(format!(
                "model features {:?} do not match transform features {:?}",
                model.features(),
                transform_names
            )));
        }
        Ok(Self { model, transform })
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn transform(&self) -> &ScalingTransform {
        &self.transform
    }

    pub fn target(&self) -> &str {
        self.model.target()
    }

    /// Expected target value for a raw (unscaled) reading
    pub fn predict(&self, reading: &Reading) -> ScorerResult<f64> {
        let scaled = self.transform.transform_reading(reading)?;
        Ok(self.model.predict_one(scaled.view()))
    }
}
