//! Scaling Transform - zero mean / unit variance per feature
//!
//! Fit once on training data, immutable afterwards. Every feature carries its
//! name so readings are bound by name, never by position.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::logic::dataset::Reading;
use crate::logic::error::{ScorerError, ScorerResult};

/// Variance indistinguishable from the rounding error of summing `n`
/// values around `mean`
fn is_constant(variance: f64, mean: f64, n: f64) -> bool {
    let bound = n * f64::EPSILON * variance + (n * mean * f64::EPSILON).powi(2);
    variance <= bound
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScale {
    pub name: String,
    pub mean: f64,
    /// Population standard deviation, 1.0 for constant columns
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingTransform {
    features: Vec<FeatureScale>,
}

impl ScalingTransform {
    /// Fit on a row-major feature matrix whose columns follow `names`
    pub fn fit(x: &Array2<f64>, names: &[String]) -> ScorerResult<Self> {
        if x.ncols() != names.len() {
            return Err(ScorerError::FeatureMismatch(format!(
                "{} feature names for {} columns",
                names.len(),
                x.ncols()
            )));
        }
        if x.nrows() == 0 {
            return Err(ScorerError::InsufficientData(
                "cannot fit scaler on zero rows".to_string(),
            ));
        }

        let n = x.nrows() as f64;
        let features = names
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let column = x.column(j);
                let mean = column.sum() / n;
                let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                let scale = if is_constant(variance, mean, n) {
                    1.0
                } else {
                    variance.sqrt()
                };

                FeatureScale {
                    name: name.clone(),
                    mean,
                    scale,
                }
            })
            .collect();

        Ok(Self { features })
    }

    pub fn from_features(features: Vec<FeatureScale>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[FeatureScale] {
        &self.features
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Scale a matrix whose columns are already in transform order
    pub fn transform_matrix(&self, x: &Array2<f64>) -> ScorerResult<Array2<f64>> {
        if x.ncols() != self.features.len() {
            return Err(ScorerError::FeatureMismatch(format!(
                "transform expects {} columns, got {}",
                self.features.len(),
                x.ncols()
            )));
        }

        let mut scaled = x.clone();
        for (j, feature) in self.features.iter().enumerate() {
            scaled
                .column_mut(j)
                .mapv_inplace(|v| (v - feature.mean) / feature.scale);
        }
        Ok(scaled)
    }

    /// Scale one reading, looking every feature up by name
    pub fn transform_reading(&self, reading: &Reading) -> ScorerResult<Array1<f64>> {
        self.features
            .iter()
            .map(|feature| {
                reading
                    .get(&feature.name)
                    .map(|v| (v - feature.mean) / feature.scale)
                    .ok_or_else(|| ScorerError::missing_column(&feature.name))
            })
            .collect::<ScorerResult<Vec<f64>>>()
            .map(Array1::from)
    }
}
