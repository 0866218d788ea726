//! Configuration types for missing value handling.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic handler setup.

use serde::{Deserialize, Serialize};

/// Strategy for handling missing numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumericStrategy {
    /// Drop rows with missing values in the column
    Drop,
    /// Use the mean of non-null values
    Mean,
    /// Use the median of non-null values
    #[default]
    Median,
    /// Use the configured constant (`numeric_fill_value`)
    Constant,
    /// Carry the last known value forward
    ForwardFill,
    /// Carry the next known value backward
    BackwardFill,
    /// Linear interpolation between the nearest known values
    Interpolate,
    /// Use K-Nearest Neighbors imputation
    Knn,
    /// Leave missing values untouched
    Keep,
}

/// Strategy for handling missing categorical (string) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CategoricalStrategy {
    /// Drop rows with missing values in the column
    Drop,
    /// Use the most frequent value (mode)
    #[default]
    Mode,
    /// Use the configured constant (`string_fill_value`)
    Constant,
    /// Add a dedicated placeholder category (`placeholder_label`)
    Placeholder,
    /// Carry the last known value forward
    ForwardFill,
    /// Carry the next known value backward
    BackwardFill,
    /// Leave missing values untouched
    Keep,
}

/// Configuration for the missing value handler.
///
/// Use [`ImputationConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_imputation::config::{ImputationConfig, NumericStrategy};
///
/// let config = ImputationConfig::builder()
///     .numeric_strategy(NumericStrategy::Interpolate)
///     .column_drop_threshold(0.5)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationConfig {
    /// Strategy for numeric columns.
    /// Default: Median
    pub numeric_strategy: NumericStrategy,

    /// Strategy for string/categorical columns.
    /// Default: Mode
    pub categorical_strategy: CategoricalStrategy,

    /// Fill value used by [`NumericStrategy::Constant`].
    /// Default: 0.0
    pub numeric_fill_value: f64,

    /// Fill value used by [`CategoricalStrategy::Constant`].
    /// Default: "Unknown"
    pub string_fill_value: String,

    /// Category label used by [`CategoricalStrategy::Placeholder`].
    /// Default: "Missing"
    pub placeholder_label: String,

    /// Number of neighbors for KNN imputation.
    /// Default: 5
    pub knn_neighbors: usize,

    /// Maximum number of consecutive values filled by forward/backward fill.
    /// Default: None (unbounded)
    pub fill_limit: Option<usize>,

    /// Columns whose missing fraction exceeds this threshold (0.0 - 1.0) are dropped
    /// before imputation.
    /// Default: None (never drop columns)
    pub column_drop_threshold: Option<f64>,

    /// Rows whose missing fraction exceeds this threshold (0.0 - 1.0) are dropped
    /// before imputation.
    /// Default: None (never drop rows)
    pub row_drop_threshold: Option<f64>,
}

impl Default for ImputationConfig {
    fn default() -> Self {
        Self {
            numeric_strategy: NumericStrategy::default(),
            categorical_strategy: CategoricalStrategy::default(),
            numeric_fill_value: 0.0,
            string_fill_value: "Unknown".to_string(),
            placeholder_label: "Missing".to_string(),
            knn_neighbors: 5,
            fill_limit: None,
            column_drop_threshold: None,
            row_drop_threshold: None,
        }
    }
}

impl ImputationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ImputationConfigBuilder {
        ImputationConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("column_drop_threshold", self.column_drop_threshold),
            ("row_drop_threshold", self.row_drop_threshold),
        ] {
            if let Some(value) = value
                && !(0.0..=1.0).contains(&value)
            {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.knn_neighbors == 0 {
            return Err(ConfigValidationError::InvalidKnnNeighbors(
                self.knn_neighbors,
            ));
        }

        if !self.numeric_fill_value.is_finite() {
            return Err(ConfigValidationError::NonFiniteFillValue(
                self.numeric_fill_value,
            ));
        }

        if self.placeholder_label.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPlaceholder);
        }

        if self.fill_limit == Some(0) {
            return Err(ConfigValidationError::InvalidFillLimit);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid KNN neighbors: {0} (must be at least 1)")]
    InvalidKnnNeighbors(usize),

    #[error("Numeric fill value must be finite, got {0}")]
    NonFiniteFillValue(f64),

    #[error("Placeholder label must not be empty")]
    EmptyPlaceholder,

    #[error("Fill limit must be at least 1 when set")]
    InvalidFillLimit,
}

/// Builder for [`ImputationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ImputationConfigBuilder {
    numeric_strategy: Option<NumericStrategy>,
    categorical_strategy: Option<CategoricalStrategy>,
    numeric_fill_value: Option<f64>,
    string_fill_value: Option<String>,
    placeholder_label: Option<String>,
    knn_neighbors: Option<usize>,
    fill_limit: Option<usize>,
    column_drop_threshold: Option<f64>,
    row_drop_threshold: Option<f64>,
}

impl ImputationConfigBuilder {
    /// Set the strategy for numeric columns.
    pub fn numeric_strategy(mut self, strategy: NumericStrategy) -> Self {
        self.numeric_strategy = Some(strategy);
        self
    }

    /// Set the strategy for string/categorical columns.
    pub fn categorical_strategy(mut self, strategy: CategoricalStrategy) -> Self {
        self.categorical_strategy = Some(strategy);
        self
    }

    /// Set the constant used for numeric constant fill.
    pub fn numeric_fill_value(mut self, value: f64) -> Self {
        self.numeric_fill_value = Some(value);
        self
    }

    /// Set the constant used for string constant fill.
    pub fn string_fill_value(mut self, value: impl Into<String>) -> Self {
        self.string_fill_value = Some(value.into());
        self
    }

    /// Set the placeholder category label.
    pub fn placeholder_label(mut self, label: impl Into<String>) -> Self {
        self.placeholder_label = Some(label.into());
        self
    }

    /// Set the number of neighbors for KNN imputation.
    pub fn knn_neighbors(mut self, k: usize) -> Self {
        self.knn_neighbors = Some(k);
        self
    }

    /// Bound the number of consecutive values filled by forward/backward fill.
    pub fn fill_limit(mut self, limit: usize) -> Self {
        self.fill_limit = Some(limit);
        self
    }

    /// Drop columns whose missing fraction exceeds `threshold`.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.7 = 70%)
    pub fn column_drop_threshold(mut self, threshold: f64) -> Self {
        self.column_drop_threshold = Some(threshold);
        self
    }

    /// Drop rows whose missing fraction exceeds `threshold`.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.8 = 80%)
    pub fn row_drop_threshold(mut self, threshold: f64) -> Self {
        self.row_drop_threshold = Some(threshold);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ImputationConfig` or an error if validation fails.
    pub fn build(self) -> Result<ImputationConfig, ConfigValidationError> {
        let defaults = ImputationConfig::default();
        let config = ImputationConfig {
            numeric_strategy: self.numeric_strategy.unwrap_or_default(),
            categorical_strategy: self.categorical_strategy.unwrap_or_default(),
            numeric_fill_value: self
                .numeric_fill_value
                .unwrap_or(defaults.numeric_fill_value),
            string_fill_value: self
                .string_fill_value
                .unwrap_or(defaults.string_fill_value),
            placeholder_label: self
                .placeholder_label
                .unwrap_or(defaults.placeholder_label),
            knn_neighbors: self.knn_neighbors.unwrap_or(defaults.knn_neighbors),
            fill_limit: self.fill_limit,
            column_drop_threshold: self.column_drop_threshold,
            row_drop_threshold: self.row_drop_threshold,
        };

        config.validate()?;
        Ok(config)
    }
}
