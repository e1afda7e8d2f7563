//! Regression metrics

use super::{check_lengths, Evaluation, MetricKind};
use crate::error::Result;
use ndarray::Array1;
use tracing::info;

fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / y_true.len() as f64
}

/// Mean squared error
#[derive(Debug, Clone, Copy, Default)]
pub struct Mse;

impl Evaluation for Mse {
    fn kind(&self) -> MetricKind {
        MetricKind::Mse
    }

    fn calculate_score(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
        check_lengths(y_true, y_pred)?;
        info!("Calculating MSE");
        let mse = mean_squared_error(y_true, y_pred);
        info!("MSE: {}", mse);
        Ok(mse)
    }
}

/// Root mean squared error
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl Evaluation for Rmse {
    fn kind(&self) -> MetricKind {
        MetricKind::Rmse
    }

    fn calculate_score(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
        check_lengths(y_true, y_pred)?;
        info!("Calculating RMSE");
        let rmse = mean_squared_error(y_true, y_pred).sqrt();
        info!("RMSE: {}", rmse);
        Ok(rmse)
    }
}

/// Coefficient of determination.
///
/// A constant `y_true` has no variance to explain: the score is 1.0 when the
/// predictions match it exactly and 0.0 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2;

impl Evaluation for R2 {
    fn kind(&self) -> MetricKind {
        MetricKind::R2
    }

    fn calculate_score(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
        check_lengths(y_true, y_pred)?;
        info!("Calculating R2");

        let mean = y_true.sum() / y_true.len() as f64;
        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

        let r2 = if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };

        info!("R2: {}", r2);
        Ok(r2)
    }
}
