//! Interpolation of missing numeric values.
//!
//! The core algorithm works on plain `Option<f64>` slices
//! ([`LinearSequenceInterpolator`]); the functions here apply it to polars
//! columns.

mod linear;

pub use linear::LinearSequenceInterpolator;

use crate::error::{ImputationError, Result};
use crate::utils::{is_numeric_dtype, series_to_f64_values};
use polars::prelude::*;
use tracing::debug;

/// Linearly interpolate a numeric Series.
///
/// The result is a `Float64` Series with the same name. Missing values at
/// the start or end of the Series remain null.
pub fn interpolate_series(series: &Series) -> Result<Series> {
    if !is_numeric_dtype(series.dtype()) {
        return Err(ImputationError::TypeConversionFailed {
            column: series.name().to_string(),
            target_type: "Float64".to_string(),
            reason: format!("interpolation requires a numeric column, got {}", series.dtype()),
        });
    }

    let values = series_to_f64_values(series)?;
    let interpolated = LinearSequenceInterpolator::interpolate(&values);

    Ok(Series::new(series.name().clone(), interpolated))
}

/// Interpolate the named columns of a DataFrame in place.
///
/// Returns the total number of cells that were filled.
pub fn interpolate_columns(df: &mut DataFrame, columns: &[String]) -> Result<usize> {
    let mut filled_total = 0;

    for col_name in columns {
        let series = df
            .column(col_name)
            .map_err(|_| ImputationError::ColumnNotFound(col_name.clone()))?
            .as_materialized_series()
            .clone();

        let before = series.null_count();
        if before == 0 {
            continue;
        }

        let values = series_to_f64_values(&series)?;
        let filled = LinearSequenceInterpolator::count_interpolable(&values);
        let interpolated = interpolate_series(&series)?;
        df.replace(col_name, interpolated)?;

        debug!(
            "Interpolated '{}': {} of {} missing values filled",
            col_name, filled, before
        );
        filled_total += filled;
    }

    Ok(filled_total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_series_basic() {
        let series = Series::new("age".into(), &[Some(25.0), None, Some(35.0)]);
        let result = interpolate_series(&series).unwrap();

        assert_eq!(result.name().as_str(), "age");
        assert_eq!(result.null_count(), 0);
        assert_eq!(result.get(1).unwrap().try_extract::<f64>().unwrap(), 30.0);
    }

    #[test]
    fn test_interpolate_series_integer_input() {
        let series = Series::new("n".into(), &[Some(10i32), None, None, Some(40)]);
        let result = interpolate_series(&series).unwrap();

        assert!(matches!(result.dtype(), DataType::Float64));
        assert_eq!(
            series_to_f64_values(&result).unwrap(),
            vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)]
        );
    }

    #[test]
    fn test_interpolate_series_keeps_edges_null() {
        let series = Series::new("x".into(), &[None, Some(1.0), None, Some(3.0), None]);
        let result = interpolate_series(&series).unwrap();

        assert_eq!(result.null_count(), 2);
        assert_eq!(result.get(2).unwrap().try_extract::<f64>().unwrap(), 2.0);
    }

    #[test]
    fn test_interpolate_series_rejects_strings() {
        let series = Series::new("city".into(), &[Some("a"), None]);
        let err = interpolate_series(&series).unwrap_err();
        assert_eq!(err.error_code(), "TYPE_CONVERSION_FAILED");
    }

    #[test]
    fn test_interpolate_columns_in_place() {
        let mut df = df![
            "age" => [Some(25.0), None, Some(35.0), None],
            "salary" => [Some(50000.0), Some(60000.0), None, Some(80000.0)],
        ]
        .unwrap();

        let filled =
            interpolate_columns(&mut df, &["age".to_string(), "salary".to_string()]).unwrap();

        assert_eq!(filled, 2);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("salary").unwrap().null_count(), 0);
        assert_eq!(
            df.column("salary")
                .unwrap()
                .get(2)
                .unwrap()
                .try_extract::<f64>()
                .unwrap(),
            70000.0
        );
    }

    #[test]
    fn test_interpolate_columns_counts_only_anchored_gaps() {
        let mut df = df![
            "level" => [None, Some(0.0), None, None, Some(3.0), None, Some(5.0), None],
        ]
        .unwrap();

        let filled = interpolate_columns(&mut df, &["level".to_string()]).unwrap();

        assert_eq!(filled, 3);
        assert_eq!(df.column("level").unwrap().null_count(), 2);
    }

    #[test]
    fn test_interpolate_columns_unknown_column() {
        let mut df = df!["a" => [1.0, 2.0]].unwrap();
        let err = interpolate_columns(&mut df, &["b".to_string()]).unwrap_err();
        assert!(matches!(err, ImputationError::ColumnNotFound(ref c) if c == "b"));
    }
}
