//! Statistical imputation methods.
//!
//! Provides mean, median, mode, constant and placeholder imputation.

use crate::error::{ImputationError, Result};
use crate::types::{ActionType, ImputationAction};
use crate::utils::{fill_numeric_nulls, fill_string_nulls, string_mode};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
///
/// Every method is a no-op for columns that do not exist or that contain no
/// missing values. Statistics are computed by polars over the non-null values;
/// a column with no observed values yields [`ImputationError::NoValidValues`].
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Apply median imputation for numeric columns.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        let Some(series) = Self::series_with_nulls(df, col_name) else {
            return Ok(());
        };
        let median_val = series
            .median()
            .ok_or_else(|| ImputationError::NoValidValues(col_name.to_string()))?;
        Self::fill_with_value(df, &series, median_val, actions, "median")
    }

    /// Apply mean imputation for numeric columns.
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        let Some(series) = Self::series_with_nulls(df, col_name) else {
            return Ok(());
        };
        let mean_val = series
            .mean()
            .ok_or_else(|| ImputationError::NoValidValues(col_name.to_string()))?;
        Self::fill_with_value(df, &series, mean_val, actions, "mean")
    }

    /// Fill a numeric column with a fixed value.
    pub fn apply_numeric_constant(
        df: &mut DataFrame,
        col_name: &str,
        value: f64,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        let Some(series) = Self::series_with_nulls(df, col_name) else {
            return Ok(());
        };
        Self::fill_with_value(df, &series, value, actions, "constant")
    }

    /// Apply mode imputation (most frequent value).
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        let Some(series) = Self::series_with_nulls(df, col_name) else {
            return Ok(());
        };

        let mode_val = string_mode(&series)
            .ok_or_else(|| ImputationError::NoValidValues(col_name.to_string()))?;
        let missing = series.null_count();
        let filled = fill_string_nulls(&series, &mode_val)?;
        df.replace(col_name, filled)?;

        debug!("Filled '{}' with mode '{}'", col_name, mode_val);
        actions.push(
            ImputationAction::new(
                ActionType::ValueImputed,
                col_name,
                format!("Filled '{}' with mode: '{}'", col_name, mode_val),
            )
            .with_details(format!("{} values", missing)),
        );

        Ok(())
    }

    /// Fill a string column with a fixed value.
    pub fn apply_string_constant(
        df: &mut DataFrame,
        col_name: &str,
        value: &str,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        let Some(series) = Self::series_with_nulls(df, col_name) else {
            return Ok(());
        };

        let missing = series.null_count();
        let filled = fill_string_nulls(&series, value)?;
        df.replace(col_name, filled)?;

        actions.push(
            ImputationAction::new(
                ActionType::ValueImputed,
                col_name,
                format!("Filled '{}' with constant value: '{}'", col_name, value),
            )
            .with_details(format!("{} values", missing)),
        );

        Ok(())
    }

    /// Mark missing values with a dedicated placeholder category.
    ///
    /// Unlike [`Self::apply_string_constant`], this records the fill as a new
    /// category so downstream encoders treat "missing" as information.
    pub fn apply_category_placeholder(
        df: &mut DataFrame,
        col_name: &str,
        label: &str,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        let Some(series) = Self::series_with_nulls(df, col_name) else {
            return Ok(());
        };

        let missing = series.null_count();
        let filled = fill_string_nulls(&series, label)?;
        df.replace(col_name, filled)?;

        actions.push(
            ImputationAction::new(
                ActionType::PlaceholderAdded,
                col_name,
                format!("Added '{}' category indicator to '{}'", label, col_name),
            )
            .with_details(format!("{} values", missing)),
        );

        Ok(())
    }

    /// Clone the named column if it exists and has missing values.
    fn series_with_nulls(df: &DataFrame, col_name: &str) -> Option<Series> {
        let series = df.column(col_name).ok()?.as_materialized_series();
        (series.null_count() > 0).then(|| series.clone())
    }

    /// Fill numeric column with a specific value.
    fn fill_with_value(
        df: &mut DataFrame,
        series: &Series,
        fill_value: f64,
        actions: &mut Vec<ImputationAction>,
        method: &str,
    ) -> Result<()> {
        let col_name = series.name().to_string();
        let missing = series.null_count();
        let filled = fill_numeric_nulls(series, fill_value)?;
        df.replace(&col_name, filled)?;

        debug!("Filled '{}' with {}: {:.2}", col_name, method, fill_value);
        actions.push(
            ImputationAction::new(
                ActionType::ValueImputed,
                col_name.as_str(),
                format!("Filled '{}' with {}: {:.2}", col_name, method, fill_value),
            )
            .with_details(format!("{} values", missing)),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::series_to_string_values;

    fn f64_at(df: &DataFrame, col: &str, idx: usize) -> f64 {
        df.column(col)
            .unwrap()
            .get(idx)
            .unwrap()
            .try_extract::<f64>()
            .unwrap()
    }

    fn strings(df: &DataFrame, col: &str) -> Vec<Option<String>> {
        series_to_string_values(df.column(col).unwrap().as_materialized_series()).unwrap()
    }

    // ========================================================================
    // numeric statistics
    // ========================================================================

    #[test]
    fn test_apply_numeric_median_basic() {
        let mut df = df![
            "values" => [Some(1.0), None, Some(3.0), None, Some(5.0)],
        ]
        .unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_numeric_median(&mut df, "values", &mut actions).unwrap();

        assert_eq!(df.column("values").unwrap().null_count(), 0);
        assert_eq!(f64_at(&df, "values", 1), 3.0);
        assert_eq!(f64_at(&df, "values", 3), 3.0);
        assert_eq!(actions.len(), 1);
        assert!(actions[0].description.contains("median"));
        assert!(actions[0].description.contains("3.00"));
    }

    #[test]
    fn test_apply_numeric_median_no_nulls_is_noop() {
        let mut df = df!["values" => [1.0, 2.0, 3.0]].unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_numeric_median(&mut df, "values", &mut actions).unwrap();

        assert!(actions.is_empty());
        assert_eq!(f64_at(&df, "values", 1), 2.0);
    }

    #[test]
    fn test_apply_numeric_median_all_nulls() {
        let mut df = df!["values" => [Option::<f64>::None, None, None]].unwrap();
        let mut actions = Vec::new();

        let err = StatisticalImputer::apply_numeric_median(&mut df, "values", &mut actions)
            .unwrap_err();

        assert!(matches!(err, ImputationError::NoValidValues(ref c) if c == "values"));
        assert!(actions.is_empty());
        assert_eq!(df.column("values").unwrap().null_count(), 3);
    }

    #[test]
    fn test_apply_numeric_median_nonexistent_column() {
        let mut df = df!["other" => [1.0, 2.0, 3.0]].unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_numeric_median(&mut df, "values", &mut actions).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_apply_numeric_mean_all_nulls() {
        let mut df = df!["values" => [Option::<f64>::None, None]].unwrap();
        let mut actions = Vec::new();

        let err =
            StatisticalImputer::apply_numeric_mean(&mut df, "values", &mut actions).unwrap_err();
        assert_eq!(err.error_code(), "NO_VALID_VALUES");
    }

    #[test]
    fn test_apply_numeric_mean_preserves_original_values() {
        let mut df = df!["values" => [Some(10.0), None, Some(20.0)]].unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_numeric_mean(&mut df, "values", &mut actions).unwrap();

        assert_eq!(f64_at(&df, "values", 0), 10.0);
        assert_eq!(f64_at(&df, "values", 1), 15.0);
        assert_eq!(f64_at(&df, "values", 2), 20.0);
        assert!(matches!(
            df.column("values").unwrap().dtype(),
            DataType::Float64
        ));
    }

    #[test]
    fn test_apply_numeric_constant() {
        let mut df = df!["values" => [Some(4i64), None]].unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_numeric_constant(&mut df, "values", 0.0, &mut actions).unwrap();

        assert_eq!(f64_at(&df, "values", 0), 4.0);
        assert_eq!(f64_at(&df, "values", 1), 0.0);
        assert_eq!(actions[0].action_type, ActionType::ValueImputed);
    }

    // ========================================================================
    // categorical
    // ========================================================================

    #[test]
    fn test_apply_mode_imputation_basic() {
        let mut df = df![
            "category" => [Some("A"), Some("B"), Some("A"), None, Some("A")],
        ]
        .unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_mode_imputation(&mut df, "category", &mut actions).unwrap();

        assert_eq!(strings(&df, "category")[3], Some("A".to_string()));
        assert!(actions[0].description.contains("mode"));
    }

    #[test]
    fn test_apply_mode_imputation_all_nulls() {
        let mut df = df!["category" => [Option::<&str>::None, None]].unwrap();
        let mut actions = Vec::new();

        let err = StatisticalImputer::apply_mode_imputation(&mut df, "category", &mut actions)
            .unwrap_err();

        assert_eq!(err.error_code(), "NO_VALID_VALUES");
        assert!(actions.is_empty());
    }

    #[test]
    fn test_apply_mode_imputation_keeps_categorical_dtype() {
        let mut df = df!["category" => [Some("A"), None, Some("A"), Some("B")]].unwrap();
        let cat = df
            .column("category")
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::from_categories(Categories::global()))
            .unwrap();
        df.replace("category", cat).unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_mode_imputation(&mut df, "category", &mut actions).unwrap();

        let column = df.column("category").unwrap();
        assert!(matches!(column.dtype(), DataType::Categorical(_, _)));
        assert_eq!(strings(&df, "category")[1], Some("A".to_string()));
    }

    #[test]
    fn test_apply_string_constant() {
        let mut df = df!["text" => [Some("Hello"), None, Some("World")]].unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_string_constant(&mut df, "text", "Unknown", &mut actions)
            .unwrap();

        assert_eq!(
            strings(&df, "text"),
            vec![
                Some("Hello".to_string()),
                Some("Unknown".to_string()),
                Some("World".to_string())
            ]
        );
    }

    #[test]
    fn test_apply_category_placeholder_multiple_nulls() {
        let mut df = df!["category" => [None, Some("A"), None, None]].unwrap();
        let mut actions = Vec::new();

        StatisticalImputer::apply_category_placeholder(&mut df, "category", "Missing", &mut actions)
            .unwrap();

        assert_eq!(
            strings(&df, "category"),
            vec![
                Some("Missing".to_string()),
                Some("A".to_string()),
                Some("Missing".to_string()),
                Some("Missing".to_string())
            ]
        );
        assert_eq!(actions[0].action_type, ActionType::PlaceholderAdded);
        assert_eq!(actions[0].details.as_deref(), Some("3 values"));
    }
}
