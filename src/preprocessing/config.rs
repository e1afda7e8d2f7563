//! Preprocessing and split configuration

use serde::{Deserialize, Serialize};

/// What to do when a column slated for removal is not in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingColumnPolicy {
    /// Skip the column silently
    Ignore,
    /// Fail with a schema error
    Raise,
}

/// Configuration for the cleaning strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Timestamp-like columns dropped before anything else
    pub timestamp_columns: Vec<String>,

    /// Policy for timestamp columns that are absent
    pub missing_timestamp_policy: MissingColumnPolicy,

    /// Measurement columns whose nulls are replaced by the column median
    pub median_columns: Vec<String>,

    /// Free-text column whose nulls get a placeholder
    pub text_column: String,

    /// Placeholder written into empty text cells
    pub text_placeholder: String,

    /// Numeric identifier columns dropped after the numeric restriction
    pub identifier_columns: Vec<String>,

    /// Policy for identifier columns that are absent
    pub missing_identifier_policy: MissingColumnPolicy,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            timestamp_columns: to_strings(&[
                "order_approved_at",
                "order_delivered_carrier_date",
                "order_delivered_customer_date",
                "order_estimated_delivery_date",
                "order_purchase_timestamp",
            ]),
            missing_timestamp_policy: MissingColumnPolicy::Ignore,
            median_columns: to_strings(&[
                "product_weight_g",
                "product_length_cm",
                "product_height_cm",
                "product_width_cm",
            ]),
            text_column: "review_comment_message".to_string(),
            text_placeholder: "No review".to_string(),
            identifier_columns: to_strings(&["customer_zip_code_prefix", "order_item_id"]),
            missing_identifier_policy: MissingColumnPolicy::Raise,
        }
    }
}

impl PreprocessingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to replace the timestamp drop-list
    pub fn with_timestamp_columns<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        self.timestamp_columns = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to replace the median-imputed columns
    pub fn with_median_columns<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        self.median_columns = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the free-text column and its placeholder
    pub fn with_text_fill(mut self, column: impl Into<String>, placeholder: impl Into<String>) -> Self {
        self.text_column = column.into();
        self.text_placeholder = placeholder.into();
        self
    }

    /// Builder method to replace the identifier drop-list
    pub fn with_identifier_columns<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        self.identifier_columns = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the policy for absent identifier columns
    pub fn with_missing_identifier_policy(mut self, policy: MissingColumnPolicy) -> Self {
        self.missing_identifier_policy = policy;
        self
    }

    /// Builder method to set the policy for absent timestamp columns
    pub fn with_missing_timestamp_policy(mut self, policy: MissingColumnPolicy) -> Self {
        self.missing_timestamp_policy = policy;
        self
    }
}

/// Configuration for the train/test split strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Column predicted by the model
    pub label_column: String,

    /// Fraction of rows held out for testing
    pub test_size: f64,

    /// Seed for the row shuffle
    pub random_state: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            label_column: "review_score".to_string(),
            test_size: 0.2,
            random_state: 42,
        }
    }
}

impl SplitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label_column = label.into();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
