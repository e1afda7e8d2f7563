//! Model traits and frame conversion helpers

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Hyperparameters handed to an estimator untouched
pub type ModelOptions = BTreeMap<String, serde_json::Value>;

/// A trained estimator that can score new rows
pub trait FittedModel {
    /// Predict one value per row of `x`
    fn predict(&self, x: &DataFrame) -> Result<Array1<f64>>;

    /// Columns the model was trained on, in order
    fn feature_names(&self) -> &[String];
}

/// A trainable estimator family
pub trait Model {
    type Fitted: FittedModel;

    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Fit on `x`/`y`; `options` are interpreted by the estimator
    fn train(&self, x: &DataFrame, y: &Series, options: &ModelOptions) -> Result<Self::Fitted>;
}

/// Column names of `df`, in order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Cast a series to `f64` values, rejecting nulls
pub fn series_to_array1(series: &Series) -> Result<Array1<f64>> {
    let as_f64 = series.cast(&DataType::Float64)?;
    let ca = as_f64.f64()?;

    if ca.null_count() > 0 {
        return Err(PipelineError::DataError(format!(
            "column '{}' contains {} null values",
            series.name(),
            ca.null_count()
        )));
    }

    Ok(ca.into_no_null_iter().collect())
}

/// Extract named columns from a DataFrame into a row-major `Array2<f64>`
pub fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Array1<f64>> = col_names
        .iter()
        .map(|col_name| {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::missing_column(col_name))?;
            series_to_array1(column.as_materialized_series())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_data[c][r]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_to_array2_row_major() {
        let df = df!("a" => &[1.0, 2.0, 3.0], "b" => &[10i64, 20, 30]).unwrap();
        let x = columns_to_array2(&df, &["b".to_string(), "a".to_string()]).unwrap();

        assert_eq!(x.shape(), &[3, 2]);
        assert_eq!(x[[0, 0]], 10.0);
        assert_eq!(x[[2, 1]], 3.0);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let df = df!("a" => &[1.0]).unwrap();
        let err = columns_to_array2(&df, &["z".to_string()]).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaError(_)));
    }

    #[test]
    fn test_nulls_are_rejected() {
        let s = Series::new("y".into(), &[Some(1.0), None]);
        assert!(matches!(series_to_array1(&s), Err(PipelineError::DataError(_))));
    }
}
