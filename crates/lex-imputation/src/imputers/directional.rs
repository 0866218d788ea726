//! Forward and backward filling.

use crate::error::{ImputationError, Result};
use crate::types::{ActionType, ImputationAction};
use polars::prelude::*;
use tracing::debug;

/// Direction in which known values are propagated into gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillDirection {
    /// Carry the last known value forward.
    Forward,
    /// Carry the next known value backward.
    Backward,
}

impl FillDirection {
    fn label(&self) -> &'static str {
        match self {
            Self::Forward => "Forward fill",
            Self::Backward => "Backward fill",
        }
    }
}

/// Propagates neighbouring known values into missing positions.
///
/// Leading nulls cannot be forward filled and trailing nulls cannot be
/// backward filled; both are left missing.
pub struct DirectionalFiller;

impl DirectionalFiller {
    /// Forward fill a column, optionally bounding consecutive fills.
    pub fn forward_fill(
        df: &mut DataFrame,
        col_name: &str,
        limit: Option<usize>,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<usize> {
        Self::fill(df, col_name, FillDirection::Forward, limit, actions)
    }

    /// Backward fill a column, optionally bounding consecutive fills.
    pub fn backward_fill(
        df: &mut DataFrame,
        col_name: &str,
        limit: Option<usize>,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<usize> {
        Self::fill(df, col_name, FillDirection::Backward, limit, actions)
    }

    /// Fill a column in the given direction; returns the number of cells filled.
    pub fn fill(
        df: &mut DataFrame,
        col_name: &str,
        direction: FillDirection,
        limit: Option<usize>,
        actions: &mut Vec<ImputationAction>,
    ) -> Result<usize> {
        let series = df
            .column(col_name)
            .map_err(|_| ImputationError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let before = series.null_count();
        if before == 0 {
            return Ok(0);
        }

        let limit = limit.map(|l| l as IdxSize);
        let strategy = match direction {
            FillDirection::Forward => FillNullStrategy::Forward(limit),
            FillDirection::Backward => FillNullStrategy::Backward(limit),
        };

        let filled_series = series.fill_null(strategy)?;
        let filled = before - filled_series.null_count();
        df.replace(col_name, filled_series)?;

        debug!(
            "{} '{}': {} of {} missing values filled",
            direction.label(),
            col_name,
            filled,
            before
        );

        if filled > 0 {
            actions.push(
                ImputationAction::new(
                    ActionType::ValueInterpolated,
                    col_name,
                    format!("{} '{}'", direction.label(), col_name),
                )
                .with_details(format!("{} of {} values", filled, before)),
            );
        }

        Ok(filled)
    }
}
