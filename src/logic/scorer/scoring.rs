use serde::{Deserialize, Serialize};

use crate::logic::dataset::Reading;
use crate::logic::error::ScorerResult;
use crate::logic::model::{threshold, ArtifactPair};

/// Outcome of scoring one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub predicted_power: f64,
    pub actual_power: Option<f64>,
    pub residual: Option<f64>,
    pub anomaly_detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedScoringResult {
    pub reading_index: usize,
    #[serde(flatten)]
    pub result: ScoringResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScoringResult {
    pub total_readings: usize,
    pub anomalies_detected: usize,
    pub anomaly_rate: f64,
    pub results: Vec<IndexedScoringResult>,
}

/// Predict, and flag only when the reading carries the actual target value
pub fn score_reading(pair: &ArtifactPair, reading: &Reading) -> ScorerResult<ScoringResult> {
    let predicted = pair.predict(reading)?;
    let actual = reading.get(pair.target());
    let residual = actual.map(|a| threshold::residual(a, predicted));
    let anomaly_detected = residual.map_or(false, threshold::is_anomalous);

    if anomaly_detected {
        tracing::warn!(
            "High positive residual {:.2} kW (actual {:.2}, predicted {:.2}): possible friction or blockage",
            residual.unwrap_or_default(),
            actual.unwrap_or_default(),
            predicted
        );
    }

    Ok(ScoringResult {
        predicted_power: predicted,
        actual_power: actual,
        residual,
        anomaly_detected,
    })
}

/// Score in input order. Any failing reading fails the whole batch.
pub fn score_batch(pair: &ArtifactPair, readings: &[Reading]) -> ScorerResult<BatchScoringResult> {
    let results = readings
        .iter()
        .enumerate()
        .map(|(reading_index, reading)| {
            score_reading(pair, reading).map(|result| IndexedScoringResult { reading_index, result })
        })
        .collect::<ScorerResult<Vec<_>>>()?;

    let anomalies_detected = results.iter().filter(|r| r.result.anomaly_detected).count();
    let anomaly_rate = if results.is_empty() {
        0.0
    } else {
        anomalies_detected as f64 / results.len() as f64
    };

    Ok(BatchScoringResult {
        total_readings: results.len(),
        anomalies_detected,
        anomaly_rate,
        results,
    })
}
