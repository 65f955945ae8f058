//! Residual threshold
//!
//! Fixed and non-adaptive: a reading is anomalous when it draws more than
//! half a kilowatt above what the model expects. Only positive residuals
//! count; under-consumption is never flagged.

/// kW above the expected draw
pub const RESIDUAL_THRESHOLD: f64 = 0.5;

/// actual - predicted
pub fn residual(actual: f64, predicted: f64) -> f64 {
    actual - predicted
}

pub fn is_anomalous(residual: f64) -> bool {
    residual > RESIDUAL_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        assert!(!is_anomalous(0.5));
        assert!(is_anomalous(0.500_001));
    }

    #[test]
    fn test_negative_residual_is_normal() {
        assert!(!is_anomalous(residual(1.0, 3.0)));
    }
}
