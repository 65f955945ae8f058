//! Ordinary least squares with intercept
//!
//! Centers X and y, then solves the least-squares problem with nalgebra's
//! SVD. Columns without variance get a zero coefficient. No randomness
//! anywhere in the fit.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::error::{ScorerError, ScorerResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    features: Vec<String>,
    target: String,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        features: &[String],
        target: &str,
    ) -> ScorerResult<Self> {
        let (n, k) = x.dim();
        if k != features.len() {
            return Err(ScorerError::FeatureMismatch(format!(
                "{} feature names for {} columns",
                features.len(),
                k
            )));
        }
        if n == 0 || y.len() != n {
            return Err(ScorerError::InsufficientData(format!(
                "cannot fit on {} rows with {} targets",
                n,
                y.len()
            )));
        }

        let x_mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(k));
        let y_mean = y.mean().unwrap_or(0.0);

        let xc = x - &x_mean;
        let yc = y - y_mean;

        let coefficients = solve_least_squares(&xc, &yc)?;
        let intercept = y_mean - x_mean.dot(&coefficients);

        Ok(Self {
            features: features.to_vec(),
            target: target.to_string(),
            coefficients: coefficients.to_vec(),
            intercept,
        })
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predict for one scaled feature vector
    pub fn predict_one(&self, x: ArrayView1<f64>) -> f64 {
        self.intercept
            + x.iter()
                .zip(&self.coefficients)
                .map(|(v, c)| v * c)
                .sum::<f64>()
    }

    /// Predict for every row of a scaled feature matrix
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        x.rows().into_iter().map(|row| self.predict_one(row)).collect()
    }
}

/// Least-squares solution of `x * beta = y` through the SVD of `x`.
///
/// Singular values below the tolerance are dropped, which gives the
/// minimum-norm solution: a column with no variance gets a zero coefficient.
fn solve_least_squares(x: &Array2<f64>, y: &Array1<f64>) -> ScorerResult<Array1<f64>> {
    let (n, k) = x.dim();
    if x.iter().all(|v| *v == 0.0) {
        return Ok(Array1::zeros(k));
    }

    let a = DMatrix::from_fn(n, k, |i, j| x[[i, j]]);
    let b = DVector::from_iterator(n, y.iter().copied());

    let svd = a.svd(true, true);
    let largest = svd.singular_values.iter().fold(0.0f64, |m, v| m.max(*v));
    let tolerance = largest * n.max(k) as f64 * f64::EPSILON;

    let beta = svd
        .solve(&b, tolerance)
        .map_err(|e| ScorerError::InsufficientData(format!("least squares solve failed: {}", e)))?;
    Ok(beta.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    #[test]
    fn test_recovers_exact_linear_relationship() {
        let x = array![[1.0, 2.0], [2.0, 0.5], [3.0, 1.0], [4.0, 3.0], [5.0, 2.5]];
        let y: Array1<f64> = x.rows().into_iter().map(|r| 1.5 + 2.0 * r[0] - 0.5 * r[1]).collect();

        let model = LinearModel::fit(&x, &y, &names(2), "y").unwrap();

        assert!((model.intercept() - 1.5).abs() < 1e-9);
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!((model.coefficients()[1] + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_constant_column_gets_zero_coefficient() {
        let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        let y = array![2.0, 4.0, 6.0];

        let model = LinearModel::fit(&x, &y, &names(2), "y").unwrap();

        assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!(model.coefficients()[1].abs() < 1e-12);
        assert!(model.intercept().abs() < 1e-9);
    }

    #[test]
    fn test_duplicated_column_shares_the_weight() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let model = LinearModel::fit(&x, &y, &names(2), "y").unwrap();

        assert!((model.coefficients()[0] - 1.0).abs() < 1e-9);
        assert!((model.coefficients()[1] - 1.0).abs() < 1e-9);
        assert!((model.predict(&x)[3] - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_row_predicts_its_target() {
        let x = array![[0.3, 0.7]];
        let y = array![4.2];

        let model = LinearModel::fit(&x, &y, &names(2), "y").unwrap();

        assert!((model.predict(&x)[0] - 4.2).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_name_count_mismatch() {
        let x = array![[1.0, 2.0]];
        let y = array![1.0];
        let result = LinearModel::fit(&x, &y, &names(3), "y");
        assert!(matches!(result, Err(ScorerError::FeatureMismatch(_))));
    }

    #[test]
    fn test_rejects_empty_input() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        let result = LinearModel::fit(&x, &y, &names(2), "y");
        assert!(matches!(result, Err(ScorerError::InsufficientData(_))));
    }
}
