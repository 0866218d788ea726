//! Dropping rows and columns that contain missing values.

use crate::detection::row_null_counts;
use crate::error::{ImputationError, Result};
use polars::prelude::*;
use tracing::debug;

/// Removes incomplete rows or columns from a dataset.
///
/// Thresholds are fractions between 0.0 and 1.0; a row or column is dropped
/// when its missing fraction is strictly greater than the threshold.
pub struct DropHandler;

impl DropHandler {
    /// Drop every row that has at least one missing value.
    ///
    /// Returns the filtered frame and the number of rows removed.
    pub fn drop_rows_with_any_missing(df: &DataFrame) -> Result<(DataFrame, usize)> {
        let keep: Vec<bool> = row_null_counts(df).iter().map(|&n| n == 0).collect();
        Self::filter_rows(df, &keep)
    }

    /// Drop rows with a missing value in any of the given columns.
    pub fn drop_rows_with_missing_in(
        df: &DataFrame,
        columns: &[String],
    ) -> Result<(DataFrame, usize)> {
        let mut keep = vec![true; df.height()];

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| ImputationError::ColumnNotFound(col_name.clone()))?;
            let mask = column.as_materialized_series().is_null();
            for (flag, is_null) in keep.iter_mut().zip(mask.into_iter()) {
                if is_null.unwrap_or(false) {
                    *flag = false;
                }
            }
        }

        Self::filter_rows(df, &keep)
    }

    /// Drop rows whose fraction of missing values exceeds `threshold`.
    pub fn drop_rows_above_threshold(
        df: &DataFrame,
        threshold: f64,
    ) -> Result<(DataFrame, usize)> {
        Self::check_threshold(threshold)?;

        if df.width() == 0 {
            return Ok((df.clone(), 0));
        }

        let total_cols = df.width() as f64;
        let keep: Vec<bool> = row_null_counts(df)
            .iter()
            .map(|&n| (n as f64 / total_cols) <= threshold)
            .collect();

        Self::filter_rows(df, &keep)
    }

    /// Drop every column that has at least one missing value.
    pub fn drop_columns_with_any_missing(df: &DataFrame) -> (DataFrame, Vec<String>) {
        let to_drop: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| col.name().to_string())
            .collect();

        Self::drop_columns(df, to_drop)
    }

    /// Drop columns whose fraction of missing values exceeds `threshold`.
    pub fn drop_columns_above_threshold(
        df: &DataFrame,
        threshold: f64,
    ) -> Result<(DataFrame, Vec<String>)> {
        Self::check_threshold(threshold)?;

        if df.height() == 0 {
            return Ok((df.clone(), Vec::new()));
        }

        let total_rows = df.height() as f64;
        let to_drop: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| (col.null_count() as f64 / total_rows) > threshold)
            .map(|col| col.name().to_string())
            .collect();

        Ok(Self::drop_columns(df, to_drop))
    }

    fn drop_columns(df: &DataFrame, to_drop: Vec<String>) -> (DataFrame, Vec<String>) {
        if to_drop.is_empty() {
            return (df.clone(), to_drop);
        }

        let cols_ref: Vec<PlSmallStr> = to_drop.iter().map(|s| s.as_str().into()).collect();
        let result = df.drop_many(cols_ref);
        debug!("Dropped {} columns: {:?}", to_drop.len(), to_drop);

        (result, to_drop)
    }

    fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<(DataFrame, usize)> {
        let removed = keep.iter().filter(|&&k| !k).count();
        if removed == 0 {
            return Ok((df.clone(), 0));
        }

        let mask = BooleanChunked::from_slice("keep".into(), keep);
        let result = df.filter(&mask)?;
        debug!("Dropped {} of {} rows", removed, df.height());

        Ok((result, removed))
    }

    fn check_threshold(threshold: f64) -> Result<()> {
        if (0.0..=1.0).contains(&threshold) {
            Ok(())
        } else {
            Err(ImputationError::InvalidConfig(format!(
                "drop threshold must be between 0.0 and 1.0, got {}",
                threshold
            )))
        }
    }
}
