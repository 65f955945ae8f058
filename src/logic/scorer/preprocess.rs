use ndarray::{Array1, Array2};

use crate::logic::dataset::{coerce_numeric, Dataset, FeatureSchema};
use crate::logic::error::{ScorerError, ScorerResult};
use crate::logic::model::{train_test_split, Partition, ScalingTransform, SPLIT_SEED};

/// Cleaned, scaled and split training data
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub train: Partition,
    pub test: Partition,
    pub transform: ScalingTransform,
    pub kept_rows: usize,
    pub dropped_rows: usize,
}

/// Validate columns, coerce to numbers, drop incomplete rows, fit the
/// scaler and split 80/20.
pub fn preprocess(dataset: &Dataset, schema: &FeatureSchema) -> ScorerResult<Preprocessed> {
    if dataset.is_empty() {
        return Err(ScorerError::DataUnavailable("no data loaded".to_string()));
    }

    for column in schema.required_columns() {
        if !dataset.has_column(column) {
            tracing::warn!("Dataset columns: {:?}", dataset.columns());
            return Err(ScorerError::missing_column(column));
        }
    }

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(dataset.len());
    let mut targets: Vec<f64> = Vec::with_capacity(dataset.len());

    for record in dataset.records() {
        let features: Option<Vec<f64>> = schema
            .features
            .iter()
            .map(|name| record.get(name).and_then(coerce_numeric))
            .collect();
        let target = record.get(&schema.target).and_then(coerce_numeric);

        if let (Some(features), Some(target)) = (features, target) {
            rows.push(features);
            targets.push(target);
        }
    }

    let kept_rows = rows.len();
    let dropped_rows = dataset.len() - kept_rows;
    tracing::info!("Data remaining after cleaning: {} records ({} dropped)", kept_rows, dropped_rows);

    if kept_rows == 0 {
        return Err(ScorerError::InsufficientData(format!(
            "all {} records were dropped during cleaning",
            dataset.len()
        )));
    }

    let x = Array2::from_shape_fn((kept_rows, schema.features.len()), |(i, j)| rows[i][j]);
    let y = Array1::from(targets);

    // Fit on every cleaned row, then split
    let transform = ScalingTransform::fit(&x, &schema.features)?;
    let scaled = transform.transform_matrix(&x)?;
    let (train, test) = train_test_split(&scaled, &y, SPLIT_SEED);

    tracing::debug!("Split into {} training / {} held-out rows", train.len(), test.len());

    Ok(Preprocessed {
        train,
        test,
        transform,
        kept_rows,
        dropped_rows,
    })
}
