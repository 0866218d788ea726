//! Imputation module for handling missing values.
//!
//! This module provides various strategies including:
//! - Dropping incomplete rows or columns
//! - Statistical imputation (mean, median, mode, constant, placeholder)
//! - Forward / backward fill
//! - KNN imputation

mod directional;
mod drop;
mod knn;
mod statistical;

pub use directional::{DirectionalFiller, FillDirection};
pub use drop::DropHandler;
pub use knn::KNNImputer;
pub use statistical::StatisticalImputer;
