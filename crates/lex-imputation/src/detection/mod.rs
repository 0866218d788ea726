//! Missing value detection.
//!
//! Builds a [`MissingValueReport`] describing where values are missing in a
//! DataFrame, both per column and per row.

use crate::types::{ColumnMissingProfile, MissingValueReport};
use crate::utils::series_dtype_category;
use polars::prelude::*;

/// Analyzer for missing values in a dataset.
pub struct MissingValueAnalyzer;

impl MissingValueAnalyzer {
    /// Analyze a DataFrame and report missing value counts.
    pub fn analyze(df: &DataFrame) -> MissingValueReport {
        let total_rows = df.height();
        let total_columns = df.width();

        let columns: Vec<ColumnMissingProfile> = df
            .get_columns()
            .iter()
            .map(|col| {
                let series = col.as_materialized_series();
                let missing_count = series.null_count();
                ColumnMissingProfile {
                    name: series.name().to_string(),
                    dtype: format!("{}", series.dtype()),
                    category: series_dtype_category(series).as_str().to_string(),
                    missing_count,
                    missing_percentage: percentage(missing_count, total_rows),
                }
            })
            .collect();

        let total_missing: usize = columns.iter().map(|c| c.missing_count).sum();
        let rows_with_missing = row_null_counts(df).iter().filter(|&&n| n > 0).count();

        MissingValueReport {
            total_rows,
            total_columns,
            total_missing,
            missing_percentage: percentage(total_missing, total_rows * total_columns),
            rows_with_missing,
            complete_rows: total_rows - rows_with_missing,
            columns,
        }
    }
}

/// Number of null cells in each row of a DataFrame.
pub fn row_null_counts(df: &DataFrame) -> Vec<usize> {
    let mut counts = vec![0usize; df.height()];

    for col in df.get_columns() {
        if col.null_count() == 0 {
            continue;
        }
        let mask = col.as_materialized_series().is_null();
        for (count, is_null) in counts.iter_mut().zip(mask.into_iter()) {
            if is_null.unwrap_or(false) {
                *count += 1;
            }
        }
    }

    counts
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}
