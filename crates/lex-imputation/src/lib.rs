//! Missing Value Handling Library
//!
//! Detection and imputation of missing values in tabular datasets, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! This library provides:
//!
//! - **Detection**: Per-column and per-row missing value reports
//! - **Dropping**: Removal of incomplete rows or columns, optionally by threshold
//! - **Statistical Imputation**: Mean, median, mode and constant fills
//! - **Placeholder Categories**: Mark missing categorical values explicitly
//! - **Forward / Backward Fill**: Propagate neighbouring known values
//! - **Linear Interpolation**: Fill interior gaps from the surrounding trend
//! - **KNN Imputation**: Estimate values from the most similar rows
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_imputation::{ImputationConfig, MissingValueHandler, NumericStrategy, CategoricalStrategy};
//! use polars::prelude::*;
//!
//! let df = df![
//!     "Age" => [Some(25.0), None, Some(35.0), Some(40.0)],
//!     "Department" => [Some("HR"), None, Some("IT"), Some("Finance")],
//! ]?;
//!
//! let config = ImputationConfig::builder()
//!     .numeric_strategy(NumericStrategy::Interpolate)
//!     .categorical_strategy(CategoricalStrategy::Placeholder)
//!     .build()?;
//!
//! let outcome = MissingValueHandler::new(config).handle(df)?;
//! println!("{}", outcome.data);
//! ```
//!
//! # Interpolating plain sequences
//!
//! The interpolation core does not depend on polars:
//!
//! ```rust
//! use lex_imputation::LinearSequenceInterpolator;
//!
//! let filled = LinearSequenceInterpolator::interpolate(&[Some(1.0), None, Some(3.0)]);
//! assert_eq!(filled, vec![Some(1.0), Some(2.0), Some(3.0)]);
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod handler;
pub mod imputers;
pub mod interpolate;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    CategoricalStrategy, ConfigValidationError, ImputationConfig, ImputationConfigBuilder,
    NumericStrategy,
};
pub use detection::MissingValueAnalyzer;
pub use error::{ImputationError, Result as ImputationResult, ResultExt};
pub use handler::MissingValueHandler;
pub use imputers::{DirectionalFiller, DropHandler, FillDirection, KNNImputer, StatisticalImputer};
pub use interpolate::{LinearSequenceInterpolator, interpolate_columns, interpolate_series};
pub use types::{
    ActionType, ColumnMissingProfile, ImputationAction, ImputationOutcome, ImputationSummary,
    MissingValueReport,
};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
