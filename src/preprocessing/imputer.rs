//! Missing value imputation

use super::is_numeric_dtype;
use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Strategy for imputing missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with mean (numeric only)
    Mean,
    /// Replace with median (numeric only)
    Median,
    /// Replace with a constant string (text columns)
    ConstantString(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ImputeValue {
    Numeric(f64),
    String(String),
    /// No observed values: the column is kept as `Float64` with its nulls
    Unobserved,
}

/// Imputer for handling missing values.
///
/// Fill values are computed from the frame passed to [`Imputer::fit`], so a
/// fit on the current table yields statistics of that table only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, ImputeValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer with the specified strategy
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Compute fill values for `columns`; every column must exist
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.fill_values.clear();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::missing_column(col_name))?;

            let value = self.compute_fill_value(col_name, column.as_materialized_series())?;
            if value == ImputeValue::Unobserved {
                warn!(column = %col_name, "Column has no observed values, leaving nulls in place");
            } else {
                debug!(column = %col_name, value = ?value, "Computed fill value");
            }
            self.fill_values.insert(col_name.to_string(), value);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Return a copy of `df` with nulls in the fitted columns replaced
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }

        let mut result = df.clone();

        for (col_name, fill_value) in &self.fill_values {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::missing_column(col_name))?;
            let filled = Self::fill_series(column.as_materialized_series(), fill_value)?;
            result.with_column(filled)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Numeric fill value computed for `column`, if any
    pub fn numeric_fill_value(&self, column: &str) -> Option<f64> {
        match self.fill_values.get(column) {
            Some(ImputeValue::Numeric(v)) => Some(*v),
            _ => None,
        }
    }

    fn compute_fill_value(&self, col_name: &str, series: &Series) -> Result<ImputeValue> {
        match &self.strategy {
            ImputeStrategy::Mean | ImputeStrategy::Median => {
                // An all-empty CSV column is inferred as String; it has nothing to check
                if series.null_count() == series.len() {
                    return Ok(ImputeValue::Unobserved);
                }
                if !is_numeric_dtype(series.dtype()) {
                    return Err(PipelineError::SchemaError(format!(
                        "column '{}' has non-numeric dtype {}",
                        col_name,
                        series.dtype()
                    )));
                }
                let ca = numeric_with_nan_as_null(series)?;
                let stat = if self.strategy == ImputeStrategy::Mean {
                    ca.mean()
                } else {
                    ca.median()
                };
                Ok(stat.map_or(ImputeValue::Unobserved, ImputeValue::Numeric))
            }
            ImputeStrategy::ConstantString(val) => Ok(ImputeValue::String(val.clone())),
        }
    }

    fn fill_series(series: &Series, fill_value: &ImputeValue) -> Result<Series> {
        match fill_value {
            ImputeValue::Numeric(val) => {
                let filled: Float64Chunked = numeric_with_nan_as_null(series)?
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(*val)))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
            ImputeValue::Unobserved => {
                let kept = numeric_with_nan_as_null(series)?;
                Ok(kept.with_name(series.name().clone()).into_series())
            }
            ImputeValue::String(val) => {
                let as_str = series.cast(&DataType::String)?;
                let filled: StringChunked = as_str
                    .str()?
                    .into_iter()
                    .map(|opt| Some(opt.unwrap_or(val.as_str())))
                    .collect();

                Ok(filled.with_name(series.name().clone()).into_series())
            }
        }
    }
}

/// Cast to `Float64` with NaN treated as missing
fn numeric_with_nan_as_null(series: &Series) -> Result<Float64Chunked> {
    let as_f64 = series.cast(&DataType::Float64)?;
    Ok(as_f64
        .f64()?
        .into_iter()
        .map(|opt| opt.filter(|v| !v.is_nan()))
        .collect())
}
