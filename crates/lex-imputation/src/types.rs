//! Core data types for missing value handling.
//!
//! These types describe what is missing in a dataset and what was done
//! about it. All of them serialize to JSON for the CLI's `--json` output.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Missing value statistics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissingProfile {
    /// Name of the column.
    pub name: String,
    /// Polars data type (as string).
    pub dtype: String,
    /// Dtype category ("numeric", "string", ...).
    pub category: String,
    /// Number of missing values.
    pub missing_count: usize,
    /// Percentage of missing values (0-100).
    pub missing_percentage: f64,
}

/// Missing value statistics for a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueReport {
    /// Number of rows.
    pub total_rows: usize,
    /// Number of columns.
    pub total_columns: usize,
    /// Total number of missing cells.
    pub total_missing: usize,
    /// Percentage of missing cells over all cells (0-100).
    pub missing_percentage: f64,
    /// Rows containing at least one missing value.
    pub rows_with_missing: usize,
    /// Rows without any missing value.
    pub complete_rows: usize,
    /// Per-column statistics, in column order.
    pub columns: Vec<ColumnMissingProfile>,
}

impl MissingValueReport {
    /// Whether any cell in the dataset is missing.
    pub fn has_missing(&self) -> bool {
        self.total_missing > 0
    }

    /// Columns with at least one missing value.
    pub fn columns_with_missing(&self) -> Vec<&ColumnMissingProfile> {
        self.columns
            .iter()
            .filter(|col| col.missing_count > 0)
            .collect()
    }

    /// Look up the profile of a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnMissingProfile> {
        self.columns.iter().find(|col| col.name == name)
    }
}

/// A single action taken while handling missing values.
///
/// Actions are recorded in order to provide an audit trail of what was
/// done to the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationAction {
    /// Type of action performed.
    pub action_type: ActionType,
    /// Target of the action (column name or "dataset").
    pub target: String,
    /// Human-readable description of the action.
    pub description: String,
    /// Additional details (e.g., fill value, number of cells).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ImputationAction {
    /// Create a new action.
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    /// Add details to the action.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl std::fmt::Display for ImputationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.action_type.display_name(), self.description)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Types of actions that can be taken on missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A column was removed from the dataset.
    ColumnRemoved,
    /// One or more rows were removed from the dataset.
    RowsRemoved,
    /// Missing values were replaced by a constant or statistic.
    ValueImputed,
    /// Missing values were filled from neighbouring positions
    /// (interpolation, forward fill, backward fill).
    ValueInterpolated,
    /// A placeholder category was added for missing values.
    PlaceholderAdded,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ColumnRemoved => "Column Removed",
            Self::RowsRemoved => "Rows Removed",
            Self::ValueImputed => "Value Imputed",
            Self::ValueInterpolated => "Value Interpolated",
            Self::PlaceholderAdded => "Placeholder Added",
        }
    }
}

/// Result of running the missing value handler on a dataset.
#[derive(Debug, Clone)]
pub struct ImputationOutcome {
    /// The processed dataset.
    pub data: DataFrame,
    /// Actions taken, in order.
    pub actions: Vec<ImputationAction>,
    /// Missing value statistics before handling.
    pub report_before: MissingValueReport,
    /// Missing value statistics after handling.
    pub report_after: MissingValueReport,
    /// Processing time in milliseconds.
    pub duration_ms: u64,
}

impl ImputationOutcome {
    /// Serializable view of the outcome (without the data itself).
    pub fn summary(&self) -> ImputationSummary {
        ImputationSummary {
            rows_before: self.report_before.total_rows,
            rows_after: self.report_after.total_rows,
            columns_before: self.report_before.total_columns,
            columns_after: self.report_after.total_columns,
            missing_before: self.report_before.total_missing,
            missing_after: self.report_after.total_missing,
            duration_ms: self.duration_ms,
            actions: self.actions.clone(),
            report_before: self.report_before.clone(),
            report_after: self.report_after.clone(),
        }
    }

    /// Whether any missing value remains in the processed dataset.
    pub fn is_complete(&self) -> bool {
        !self.report_after.has_missing()
    }
}

/// JSON-friendly summary of an [`ImputationOutcome`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub missing_before: usize,
    pub missing_after: usize,
    pub duration_ms: u64,
    pub actions: Vec<ImputationAction>,
    pub report_before: MissingValueReport,
    pub report_after: MissingValueReport,
}
