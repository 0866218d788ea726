//! Shared utilities for missing value handling.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for imputation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

impl DtypeCategory {
    /// Short lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Datetime => "datetime",
            Self::Boolean => "binary",
            Self::String => "string",
            Self::Other => "other",
        }
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Get the dtype category of a Series.
pub fn series_dtype_category(series: &Series) -> DtypeCategory {
    get_dtype_category(series.dtype())
}

// =============================================================================
// Series Conversion Utilities
// =============================================================================

/// Extract a numeric Series as a vector of optional `f64` values.
pub fn series_to_f64_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().collect())
}

/// Extract a Series as a vector of optional strings.
pub fn series_to_string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Calculate the mode (most frequent value) of a Series rendered as strings.
///
/// Ties resolve to the lexicographically smallest value so the result is
/// stable across runs.
pub fn string_mode(series: &Series) -> Option<String> {
    let values = series_to_string_values(series).ok()?;

    let mut value_counts: HashMap<String, usize> = HashMap::new();
    for val in values.into_iter().flatten() {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then_with(|| b_val.cmp(a_val))
        })
        .map(|(val, _)| val)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let filled: Vec<Option<f64>> = series_to_f64_values(series)?
        .into_iter()
        .map(|v| Some(v.unwrap_or(fill_value)))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a Series with a string value.
///
/// `Categorical` input stays `Categorical`, with `fill_value` added as a
/// category if it is new. Every other input becomes `String`.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<Option<String>> = series_to_string_values(series)?
        .into_iter()
        .map(|v| Some(v.unwrap_or_else(|| fill_value.to_string())))
        .collect();
    let filled = Series::new(series.name().clone(), filled);

    match series.dtype() {
        DataType::Categorical(_, _) => filled.cast(series.dtype()),
        _ => Ok(filled),
    }
}

// =============================================================================
// Tests
// =============================================================================
