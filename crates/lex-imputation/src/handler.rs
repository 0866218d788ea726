//! Missing value handler.
//!
//! Applies an [`ImputationConfig`] to every column of a DataFrame and keeps an
//! audit trail of what was done.

use crate::config::{CategoricalStrategy, ImputationConfig, NumericStrategy};
use crate::detection::MissingValueAnalyzer;
use crate::error::{ImputationError, Result, ResultExt};
use crate::imputers::{DirectionalFiller, DropHandler, KNNImputer, StatisticalImputer};
use crate::interpolate::interpolate_columns;
use crate::types::{ActionType, ImputationAction, ImputationOutcome};
use crate::utils::{DtypeCategory, series_dtype_category};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Handles missing values in a DataFrame according to a configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_imputation::{ImputationConfig, MissingValueHandler, NumericStrategy};
///
/// let config = ImputationConfig::builder()
///     .numeric_strategy(NumericStrategy::Interpolate)
///     .build()?;
///
/// let outcome = MissingValueHandler::new(config).handle(df)?;
/// for action in &outcome.actions {
///     println!("{}", action);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MissingValueHandler {
    config: ImputationConfig,
}

impl MissingValueHandler {
    /// Create a handler with the given configuration.
    pub fn new(config: ImputationConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ImputationConfig {
        &self.config
    }

    /// Handle missing values in `df`.
    ///
    /// Steps, in order:
    /// 1. drop columns above `column_drop_threshold` (if set)
    /// 2. drop rows above `row_drop_threshold` (if set)
    /// 3. fill each remaining column according to its dtype and strategy
    /// 4. drop rows for columns whose strategy is `Drop`
    ///
    /// Strategies that cannot fill every cell (interpolation, directional
    /// fills) leave the remaining cells missing; this is reported, not an
    /// error.
    pub fn handle(&self, df: DataFrame) -> Result<ImputationOutcome> {
        let start = Instant::now();
        self.config
            .validate()
            .map_err(|e| ImputationError::InvalidConfig(e.to_string()))?;

        let report_before = MissingValueAnalyzer::analyze(&df);
        info!(
            "Handling missing values: {} missing cells across {} columns",
            report_before.total_missing,
            report_before.columns_with_missing().len()
        );

        let mut df = df;
        let mut actions = Vec::new();

        if let Some(threshold) = self.config.column_drop_threshold {
            let (filtered, dropped) = DropHandler::drop_columns_above_threshold(&df, threshold)?;
            df = filtered;
            for name in &dropped {
                actions.push(ImputationAction::new(
                    ActionType::ColumnRemoved,
                    name.as_str(),
                    format!(
                        "Removed column '{}' (>{:.0}% missing)",
                        name,
                        threshold * 100.0
                    ),
                ));
            }
        }

        if let Some(threshold) = self.config.row_drop_threshold {
            let (filtered, removed) = DropHandler::drop_rows_above_threshold(&df, threshold)?;
            df = filtered;
            if removed > 0 {
                actions.push(ImputationAction::new(
                    ActionType::RowsRemoved,
                    "dataset",
                    format!(
                        "Removed {} rows with >{:.0}% missing values",
                        removed,
                        threshold * 100.0
                    ),
                ));
            }
        }

        let columns_with_missing: Vec<(String, DtypeCategory)> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| {
                (
                    col.name().to_string(),
                    series_dtype_category(col.as_materialized_series()),
                )
            })
            .collect();

        let mut drop_rows_in = Vec::new();
        for (col_name, category) in &columns_with_missing {
            debug!("Processing '{}' ({})", col_name, category.as_str());
            let result = match category {
                DtypeCategory::Numeric => {
                    self.handle_numeric(&mut df, col_name, &mut drop_rows_in, &mut actions)
                }
                DtypeCategory::String => {
                    self.handle_categorical(&mut df, col_name, &mut drop_rows_in, &mut actions)
                }
                DtypeCategory::Datetime | DtypeCategory::Boolean | DtypeCategory::Other => {
                    self.handle_sequential(&mut df, col_name, &mut actions)
                }
            };

            match result {
                // Nothing observed to impute from: keep the column as it is.
                Err(
                    e @ (ImputationError::NoValidValues(_)
                    | ImputationError::ImputationFailed { .. }),
                ) => warn!("Leaving '{}' unfilled: {}", col_name, e),
                other => other.context(format!(
                    "Handling {} column '{}'",
                    category.as_str(),
                    col_name
                ))?,
            }
        }

        if !drop_rows_in.is_empty() {
            let (filtered, removed) = DropHandler::drop_rows_with_missing_in(&df, &drop_rows_in)?;
            df = filtered;
            if removed > 0 {
                actions.push(
                    ImputationAction::new(
                        ActionType::RowsRemoved,
                        "dataset",
                        format!("Removed {} rows with missing values", removed),
                    )
                    .with_details(format!("columns: {}", drop_rows_in.join(", "))),
                );
            }
        }

        let report_after = MissingValueAnalyzer::analyze(&df);
        if report_after.has_missing() {
            warn!(
                "{} missing values remain after handling",
                report_after.total_missing
            );
        } else {
            info!("All missing values handled successfully");
        }

        Ok(ImputationOutcome {
            data: df,
            actions,
            report_before,
            report_after,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Handle missing values in a numeric column.
    fn handle_numeric(
        &self,
        df: &mut DataFrame,
        col_name: &str,
        drop_rows_in: &mut Vec<String>,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        match self.config.numeric_strategy {
            NumericStrategy::Drop => drop_rows_in.push(col_name.to_string()),
            NumericStrategy::Mean => StatisticalImputer::apply_numeric_mean(df, col_name, actions)?,
            NumericStrategy::Median => {
                StatisticalImputer::apply_numeric_median(df, col_name, actions)?
            }
            NumericStrategy::Constant => StatisticalImputer::apply_numeric_constant(
                df,
                col_name,
                self.config.numeric_fill_value,
                actions,
            )?,
            NumericStrategy::ForwardFill => {
                DirectionalFiller::forward_fill(df, col_name, self.config.fill_limit, actions)?;
            }
            NumericStrategy::BackwardFill => {
                DirectionalFiller::backward_fill(df, col_name, self.config.fill_limit, actions)?;
            }
            NumericStrategy::Interpolate => {
                let before = df.column(col_name)?.null_count();
                let filled = interpolate_columns(df, &[col_name.to_string()])?;
                if filled > 0 {
                    actions.push(
                        ImputationAction::new(
                            ActionType::ValueInterpolated,
                            col_name,
                            format!("Linearly interpolated '{}'", col_name),
                        )
                        .with_details(format!("{} of {} values", filled, before)),
                    );
                }
                if filled < before {
                    debug!(
                        "'{}': {} values lack an anchor on one side and stay missing",
                        col_name,
                        before - filled
                    );
                }
            }
            NumericStrategy::Knn => {
                let missing = df.column(col_name)?.null_count();
                let imputer = KNNImputer::new(self.config.knn_neighbors);
                let imputed = imputer.fit_transform(df, &[col_name.to_string()])?;
                let series = imputed.column(col_name)?.as_materialized_series().clone();
                df.replace(col_name, series)?;

                actions.push(
                    ImputationAction::new(
                        ActionType::ValueImputed,
                        col_name,
                        format!("KNN imputed '{}' (K={})", col_name, imputer.n_neighbors()),
                    )
                    .with_details(format!("{} values", missing)),
                );
            }
            NumericStrategy::Keep => {
                debug!("Keeping missing values in '{}'", col_name);
            }
        }
        Ok(())
    }

    /// Handle missing values in a string/categorical column.
    fn handle_categorical(
        &self,
        df: &mut DataFrame,
        col_name: &str,
        drop_rows_in: &mut Vec<String>,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        match self.config.categorical_strategy {
            CategoricalStrategy::Drop => drop_rows_in.push(col_name.to_string()),
            CategoricalStrategy::Mode => {
                StatisticalImputer::apply_mode_imputation(df, col_name, actions)?
            }
            CategoricalStrategy::Constant => StatisticalImputer::apply_string_constant(
                df,
                col_name,
                &self.config.string_fill_value,
                actions,
            )?,
            CategoricalStrategy::Placeholder => StatisticalImputer::apply_category_placeholder(
                df,
                col_name,
                &self.config.placeholder_label,
                actions,
            )?,
            CategoricalStrategy::ForwardFill => {
                DirectionalFiller::forward_fill(df, col_name, self.config.fill_limit, actions)?;
            }
            CategoricalStrategy::BackwardFill => {
                DirectionalFiller::backward_fill(df, col_name, self.config.fill_limit, actions)?;
            }
            CategoricalStrategy::Keep => {
                debug!("Keeping missing values in '{}'", col_name);
            }
        }
        Ok(())
    }

    /// Forward then backward fill columns with no meaningful statistic
    /// (dates, booleans, nested types).
    fn handle_sequential(
        &self,
        df: &mut DataFrame,
        col_name: &str,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<()> {
        DirectionalFiller::forward_fill(df, col_name, self.config.fill_limit, actions)?;
        DirectionalFiller::backward_fill(df, col_name, self.config.fill_limit, actions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{series_to_f64_values, series_to_string_values};

    /// The four-row example dataset used throughout the docs.
    fn example_df() -> DataFrame {
        df![
            "Name" => [Some("Alice"), Some("Bob"), None, Some("David")],
            "Age" => [Some(25.0), None, Some(35.0), Some(40.0)],
            "Salary" => [Some(50000.0), Some(60000.0), None, Some(80000.0)],
            "Department" => [Some("HR"), None, Some("IT"), Some("Finance")],
        ]
        .unwrap()
    }

    fn handle(config: ImputationConfig) -> ImputationOutcome {
        MissingValueHandler::new(config).handle(example_df()).unwrap()
    }

    fn numbers(outcome: &ImputationOutcome, col: &str) -> Vec<Option<f64>> {
        series_to_f64_values(outcome.data.column(col).unwrap().as_materialized_series()).unwrap()
    }

    fn strings(outcome: &ImputationOutcome, col: &str) -> Vec<Option<String>> {
        series_to_string_values(outcome.data.column(col).unwrap().as_materialized_series())
            .unwrap()
    }

    #[test]
    fn test_default_config_fills_everything() {
        let outcome = handle(ImputationConfig::default());

        assert!(outcome.is_complete());
        assert_eq!(outcome.report_before.total_missing, 4);
        assert_eq!(outcome.data.height(), 4);
        // Median of [25, 35, 40]
        assert_eq!(numbers(&outcome, "Age")[1], Some(35.0));
        // Median of [50000, 60000, 80000]
        assert_eq!(numbers(&outcome, "Salary")[2], Some(60000.0));
    }

    #[test]
    fn test_interpolate_strategy() {
        let config = ImputationConfig::builder()
            .numeric_strategy(NumericStrategy::Interpolate)
            .categorical_strategy(CategoricalStrategy::Keep)
            .build()
            .unwrap();
        let outcome = handle(config);

        assert_eq!(
            numbers(&outcome, "Age"),
            vec![Some(25.0), Some(30.0), Some(35.0), Some(40.0)]
        );
        assert_eq!(numbers(&outcome, "Salary")[2], Some(70000.0));
        assert_eq!(outcome.report_after.total_missing, 2);
        assert!(
            outcome
                .actions
                .iter()
                .all(|a| a.action_type == ActionType::ValueInterpolated)
        );
    }

    #[test]
    fn test_placeholder_strategy() {
        let config = ImputationConfig::builder()
            .categorical_strategy(CategoricalStrategy::Placeholder)
            .build()
            .unwrap();
        let outcome = handle(config);

        assert_eq!(strings(&outcome, "Department")[1], Some("Missing".to_string()));
        assert_eq!(strings(&outcome, "Name")[2], Some("Missing".to_string()));
    }

    #[test]
    fn test_drop_strategies_remove_rows_once() {
        let config = ImputationConfig::builder()
            .numeric_strategy(NumericStrategy::Drop)
            .categorical_strategy(CategoricalStrategy::Drop)
            .build()
            .unwrap();
        let outcome = handle(config);

        assert_eq!(outcome.data.height(), 2);
        assert!(outcome.is_complete());
        let row_actions: Vec<_> = outcome
            .actions
            .iter()
            .filter(|a| a.action_type == ActionType::RowsRemoved)
            .collect();
        assert_eq!(row_actions.len(), 1);
    }

    #[test]
    fn test_constant_strategies() {
        let config = ImputationConfig::builder()
            .numeric_strategy(NumericStrategy::Constant)
            .numeric_fill_value(-1.0)
            .categorical_strategy(CategoricalStrategy::Constant)
            .string_fill_value("Unknown")
            .build()
            .unwrap();
        let outcome = handle(config);

        assert_eq!(numbers(&outcome, "Age")[1], Some(-1.0));
        assert_eq!(strings(&outcome, "Name")[2], Some("Unknown".to_string()));
    }

    #[test]
    fn test_forward_fill_strategy() {
        let config = ImputationConfig::builder()
            .numeric_strategy(NumericStrategy::ForwardFill)
            .categorical_strategy(CategoricalStrategy::ForwardFill)
            .build()
            .unwrap();
        let outcome = handle(config);

        assert_eq!(numbers(&outcome, "Age")[1], Some(25.0));
        assert_eq!(strings(&outcome, "Department")[1], Some("HR".to_string()));
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_knn_strategy() {
        let config = ImputationConfig::builder()
            .numeric_strategy(NumericStrategy::Knn)
            .knn_neighbors(2)
            .build()
            .unwrap();
        let outcome = handle(config);

        assert!(outcome.is_complete());
        let age = numbers(&outcome, "Age")[1].unwrap();
        assert!((25.0..=40.0).contains(&age));
    }

    #[test]
    fn test_column_threshold_drops_sparse_column() {
        let df = df![
            "dense" => [Some(1.0), Some(2.0), None, Some(4.0)],
            "sparse" => [None, None, None, Some(1.0)],
        ]
        .unwrap();
        let config = ImputationConfig::builder()
            .column_drop_threshold(0.5)
            .build()
            .unwrap();

        let outcome = MissingValueHandler::new(config).handle(df).unwrap();

        assert_eq!(outcome.data.width(), 1);
        assert_eq!(outcome.actions[0].action_type, ActionType::ColumnRemoved);
        assert_eq!(outcome.actions[0].target, "sparse");
    }

    #[test]
    fn test_row_threshold_drops_sparse_rows() {
        let df = df![
            "a" => [Some(1.0), None, Some(3.0)],
            "b" => [Some(1.0), None, Some(3.0)],
            "c" => [Some(1.0), Some(2.0), None],
        ]
        .unwrap();
        let config = ImputationConfig::builder()
            .row_drop_threshold(0.5)
            .build()
            .unwrap();

        let outcome = MissingValueHandler::new(config).handle(df).unwrap();

        assert_eq!(outcome.data.height(), 2);
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_all_missing_column_is_left_unfilled() {
        let df = df![
            "score" => [Some(1.0), None, Some(3.0)],
            "empty" => [Option::<f64>::None, None, None],
            "label" => [Option::<&str>::None, None, None],
        ]
        .unwrap();

        for strategy in [NumericStrategy::Mean, NumericStrategy::Median, NumericStrategy::Knn] {
            let config = ImputationConfig::builder()
                .numeric_strategy(strategy)
                .categorical_strategy(CategoricalStrategy::Mode)
                .build()
                .unwrap();

            let outcome = MissingValueHandler::new(config).handle(df.clone()).unwrap();

            assert_eq!(outcome.data.column("score").unwrap().null_count(), 0);
            assert_eq!(outcome.data.column("empty").unwrap().null_count(), 3);
            assert_eq!(outcome.data.column("label").unwrap().null_count(), 3);
            assert_eq!(outcome.report_after.total_missing, 6);
        }
    }

    #[test]
    fn test_categorical_column_keeps_dtype() {
        let mut df = example_df();
        let department = df
            .column("Department")
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::from_categories(Categories::global()))
            .unwrap();
        df.replace("Department", department).unwrap();
        let config = ImputationConfig::builder()
            .categorical_strategy(CategoricalStrategy::Placeholder)
            .build()
            .unwrap();

        let outcome = MissingValueHandler::new(config).handle(df).unwrap();

        assert!(matches!(
            outcome.data.column("Department").unwrap().dtype(),
            DataType::Categorical(_, _)
        ));
        assert_eq!(strings(&outcome, "Department")[1], Some("Missing".to_string()));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ImputationConfig::default();
        config.knn_neighbors = 0;

        let err = MissingValueHandler::new(config)
            .handle(example_df())
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_summary_serializes() {
        let outcome = handle(ImputationConfig::default());
        let json = serde_json::to_string(&outcome.summary()).unwrap();

        assert!(json.contains("\"missing_before\":4"));
        assert!(json.contains("\"missing_after\":0"));
    }
}
