use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Held-out evaluation of a trained model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub mse: f64,
    pub r2: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

pub fn mean_squared_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    sum / actual.len() as f64
}

/// Coefficient of determination.
///
/// A constant target has no variance to explain: 1.0 for a perfect fit,
/// 0.0 otherwise.
pub fn r2_score(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let mean = actual.mean().unwrap_or(0.0);
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_prediction() {
        let y = array![1.0, 2.0, 3.0];
        assert_eq!(mean_squared_error(&y, &y), 0.0);
        assert_eq!(r2_score(&y, &y), 1.0);
    }

    #[test]
    fn test_known_values() {
        let actual = array![3.0, -0.5, 2.0, 7.0];
        let predicted = array![2.5, 0.0, 2.0, 8.0];

        assert!((mean_squared_error(&actual, &predicted) - 0.375).abs() < 1e-12);
        assert!((r2_score(&actual, &predicted) - 0.948_608_137_044_967_9).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target() {
        let actual = array![2.0, 2.0];
        assert_eq!(r2_score(&actual, &array![2.0, 2.0]), 1.0);
        assert_eq!(r2_score(&actual, &array![2.0, 2.5]), 0.0);
    }
}
