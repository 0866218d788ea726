//! K-nearest-neighbours imputation for numeric columns.

use crate::error::{ImputationError, Result};
use crate::utils::{is_numeric_dtype, series_to_f64_values};
use polars::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

/// Row-major numeric view of a DataFrame; `None` marks a missing cell.
type DataMatrix = Vec<Vec<Option<f64>>>;

/// Imputes missing numeric values from the `k` most similar rows.
///
/// Similarity is a normalised Euclidean distance over the numeric features
/// both rows have observed, excluding the column being imputed. Neighbour
/// values are averaged with inverse-distance weights. Within one
/// [`Self::fit_transform`] call distances come from the input frame, so
/// values imputed for one target column are not used as features for
/// another; callers that impute column by column on an updated frame do
/// see earlier fills.
#[derive(Debug, Clone)]
pub struct KNNImputer {
    n_neighbors: usize,
}

impl KNNImputer {
    /// Create a new KNN imputer with the given number of neighbors (at least 1).
    pub fn new(n_neighbors: usize) -> Self {
        Self {
            n_neighbors: n_neighbors.max(1),
        }
    }

    /// Number of neighbours consulted per imputed value.
    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    /// Impute missing values in the given columns and return a new DataFrame.
    ///
    /// Non-numeric columns and columns without missing values are skipped.
    /// A target column with no observed values fails with
    /// [`ImputationError::ImputationFailed`].
    pub fn fit_transform(&self, df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
        let mut result_df = df.clone();

        let mut targets = Vec::new();
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| ImputationError::ColumnNotFound(col_name.clone()))?;
            if column.null_count() > 0 && is_numeric_dtype(column.dtype()) {
                targets.push(col_name.as_str());
            }
        }

        if targets.is_empty() {
            return Ok(result_df);
        }

        debug!("KNN imputing {} columns (k={})", targets.len(), self.n_neighbors);

        let feature_cols: Vec<&str> = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().as_str())
            .collect();

        let matrix = self.create_data_matrix(df, &feature_cols)?;

        for col_name in targets {
            let col_idx = feature_cols
                .iter()
                .position(|c| *c == col_name)
                .ok_or_else(|| ImputationError::ColumnNotFound(col_name.to_string()))?;

            let fallback =
                column_mean(&matrix, col_idx).ok_or_else(|| ImputationError::ImputationFailed {
                    column: col_name.to_string(),
                    reason: "column has no observed values to learn from".to_string(),
                })?;

            let imputed: Vec<Option<f64>> = matrix
                .iter()
                .enumerate()
                .map(|(row_idx, row)| {
                    Some(row[col_idx].unwrap_or_else(|| {
                        self.impute_value(&matrix, row_idx, col_idx, fallback)
                    }))
                })
                .collect();

            result_df.replace(col_name, Series::new(col_name.into(), imputed))?;
        }

        Ok(result_df)
    }

    /// Build the row-major matrix of the given numeric columns as `f64`.
    fn create_data_matrix(&self, df: &DataFrame, columns: &[&str]) -> Result<DataMatrix> {
        let mut matrix = vec![vec![None; columns.len()]; df.height()];

        for (col_idx, col_name) in columns.iter().enumerate() {
            let values = series_to_f64_values(df.column(col_name)?.as_materialized_series())?;
            for (row, value) in matrix.iter_mut().zip(values) {
                row[col_idx] = value;
            }
        }

        Ok(matrix)
    }

    /// Estimate the value at (`target_row`, `target_col`) from its neighbours,
    /// or return `fallback` when no neighbour carries any weight.
    fn impute_value(
        &self,
        matrix: &[Vec<Option<f64>>],
        target_row: usize,
        target_col: usize,
        fallback: f64,
    ) -> f64 {
        let mut distances: Vec<(f64, f64)> = matrix
            .iter()
            .enumerate()
            .filter(|(row_idx, _)| *row_idx != target_row)
            .filter_map(|(_, row)| {
                row[target_col].map(|value| {
                    (
                        self.calculate_distance(&matrix[target_row], row, target_col),
                        value,
                    )
                })
            })
            .collect();

        if distances.is_empty() {
            return fallback;
        }

        distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for &(distance, value) in distances.iter().take(self.n_neighbors) {
            // Exact matches dominate every other neighbour.
            let weight = if distance < 1e-10 { 1e10 } else { 1.0 / distance };
            weighted_sum += value * weight;
            weight_sum += weight;
        }

        if weight_sum > 0.0 {
            weighted_sum / weight_sum
        } else {
            fallback
        }
    }

    /// Normalised Euclidean distance between two rows, ignoring `skip_col`
    /// and any feature missing in either row.
    fn calculate_distance(&self, row1: &[Option<f64>], row2: &[Option<f64>], skip_col: usize) -> f64 {
        let (sum_squared_diff, count) = row1
            .iter()
            .zip(row2)
            .enumerate()
            .filter(|(col_idx, _)| *col_idx != skip_col)
            .filter_map(|(_, pair)| match pair {
                (Some(a), Some(b)) => Some((a - b) * (a - b)),
                _ => None,
            })
            .fold((0.0, 0usize), |(sum, n), sq| (sum + sq, n + 1));

        if count > 0 {
            (sum_squared_diff / count as f64).sqrt()
        } else {
            f64::INFINITY
        }
    }
}

/// Mean of the observed values in a matrix column.
fn column_mean(matrix: &[Vec<Option<f64>>], col_idx: usize) -> Option<f64> {
    let (sum, count) = matrix
        .iter()
        .filter_map(|row| row[col_idx])
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    (count > 0).then(|| sum / count as f64)
}
