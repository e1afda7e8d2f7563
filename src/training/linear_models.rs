//! Linear regression estimator

use super::models::{column_names, columns_to_array2, series_to_array1, FittedModel, Model, ModelOptions};
use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Cholesky factorisation and solve of a symmetric positive-definite system.
/// Returns `None` when a pivot is not strictly positive.
fn cholesky(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Cholesky solve, retried once with a tiny ridge on the diagonal
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    if let Some(x) = cholesky(a, b) {
        return Some(x);
    }

    let mut a_reg = a.clone();
    let ridge = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n as f64;
    for k in 0..n {
        a_reg[[k, k]] += ridge;
    }
    cholesky(&a_reg, b)
}

/// Gauss-Jordan solve with partial pivoting (fallback)
fn gauss_jordan_solve(m: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = m.nrows();
    if n != m.ncols() || n != b.len() {
        return None;
    }

    // Augmented matrix [M | b]
    let mut aug = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n]] = b[i];
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-10 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..=n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..=n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    Some(aug.column(n).to_owned())
}

/// Linear regression fitted by (optionally ridge-regularised) least squares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights), one per feature
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    /// Whether to fit intercept
    pub fit_intercept: bool,
    /// Regularization strength (L2); zero means ordinary least squares
    pub alpha: f64,
    /// Feature columns seen during fit
    pub feature_names: Vec<String>,
    /// Whether model is fitted
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            alpha: 0.0,
            feature_names: Vec::new(),
            is_fitted: false,
        }
    }

    /// Build an unfitted model from estimator options.
    ///
    /// Recognised keys: `fit_intercept` (bool) and `alpha` (number >= 0).
    pub fn from_options(options: &ModelOptions) -> Result<Self> {
        let mut model = Self::new();

        for (name, value) in options {
            match name.as_str() {
                "fit_intercept" => {
                    let flag = value
                        .as_bool()
                        .ok_or_else(|| invalid(name, value, "expected a boolean"))?;
                    model = model.with_fit_intercept(flag);
                }
                "alpha" => {
                    let alpha = value
                        .as_f64()
                        .ok_or_else(|| invalid(name, value, "expected a number"))?;
                    if !(alpha >= 0.0) {
                        return Err(invalid(name, value, "must be non-negative"));
                    }
                    model = model.with_alpha(alpha);
                }
                _ => return Err(invalid(name, value, "unknown option for linear regression")),
            }
        }

        Ok(model)
    }

    /// Enable/disable fitting intercept
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Set regularization strength (Ridge regression)
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fit the model to training arrays
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(PipelineError::length_mismatch("y", n_samples, y.len()));
        }
        if n_samples == 0 {
            return Err(PipelineError::ShapeError {
                expected: "at least one training sample".to_string(),
                actual: "0 samples".to_string(),
            });
        }

        // Center data if fitting intercept
        let (x_work, y_work, means) = if self.fit_intercept {
            let x_mean = x
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(n_features));
            let y_mean = y.mean().unwrap_or(0.0);
            let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
            let y_centered = y - y_mean;
            (x_centered, y_centered, Some((x_mean, y_mean)))
        } else {
            (x.clone(), y.clone(), None)
        };

        // Solve normal equations: (X^T X + alpha*I) * w = X^T y
        let mut xtx = x_work.t().dot(&x_work);
        for i in 0..n_features {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_work.t().dot(&y_work);

        let coefficients = cholesky_solve(&xtx, &xty)
            .or_else(|| gauss_jordan_solve(&xtx, &xty))
            .ok_or_else(|| {
                PipelineError::ComputationError(
                    "Matrix is singular, cannot solve least squares".to_string(),
                )
            })?;

        let intercept = match means {
            Some((x_mean, y_mean)) => y_mean - coefficients.dot(&x_mean),
            None => 0.0,
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;

        Ok(self)
    }

    /// Predict from a feature array laid out like the training array
    pub fn predict_array(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(PipelineError::ModelNotFitted),
        };

        if x.ncols() != coefficients.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}

impl FittedModel for LinearRegression {
    fn predict(&self, x: &DataFrame) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }
        let x = columns_to_array2(x, &self.feature_names)?;
        self.predict_array(&x)
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

/// [`Model`] producing a fitted [`LinearRegression`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegressionModel;

impl Model for LinearRegressionModel {
    type Fitted = LinearRegression;

    fn name(&self) -> &str {
        "linear_regression"
    }

    fn train(&self, x: &DataFrame, y: &Series, options: &ModelOptions) -> Result<LinearRegression> {
        let mut reg = LinearRegression::from_options(options)?;

        if x.height() != y.len() {
            return Err(PipelineError::length_mismatch("labels", x.height(), y.len()));
        }

        let feature_names = column_names(x);
        let x_arr = columns_to_array2(x, &feature_names)?;
        let y_arr = series_to_array1(y)?;

        reg.fit(&x_arr, &y_arr)?;
        reg.feature_names = feature_names;

        info!(
            features = reg.feature_names.len(),
            samples = x.height(),
            "Model training complete"
        );
        Ok(reg)
    }
}

fn invalid(name: &str, value: &Value, reason: &str) -> PipelineError {
    PipelineError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
