//! Data preprocessing module
//!
//! Table transformations are expressed as interchangeable strategies:
//! - [`DataPreprocessingStrategy`] drops unusable columns, imputes missing
//!   values and restricts the table to numeric features
//! - [`DataSplitStrategy`] partitions a table into train/test features and labels
//!
//! [`DataCleaning`] runs any strategy over a table with a uniform
//! log-and-surface error convention.

mod cleaning;
mod config;
mod imputer;
mod pipeline;
mod split;

pub use cleaning::DataPreprocessingStrategy;
pub use config::{MissingColumnPolicy, PreprocessingConfig, SplitConfig};
pub use imputer::{ImputeStrategy, Imputer};
pub use pipeline::DataCleaning;
pub use split::{DataSplitStrategy, FeatureLabelSplit};

use crate::error::Result;
use polars::prelude::*;

/// A table transformation selected by the caller.
///
/// Implementations must leave the input untouched and return a new value.
pub trait DataStrategy {
    /// What the strategy produces: a table, a split, ...
    type Output;

    /// Short name used in log lines
    fn name(&self) -> &str;

    fn handle(&self, data: &DataFrame) -> Result<Self::Output>;
}

/// Check if dtype is numeric (booleans excluded)
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}
