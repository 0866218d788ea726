//! CLI entry point for missing value handling.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_imputation::{
    CategoricalStrategy, ImputationConfig, ImputationOutcome, MissingValueAnalyzer,
    MissingValueHandler, MissingValueReport, NumericStrategy,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible numeric strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNumericStrategy {
    /// Drop rows with missing values
    Drop,
    /// Use the mean of non-null values
    Mean,
    /// Use the median of non-null values
    Median,
    /// Use the value given by --fill-value
    Constant,
    /// Carry the last known value forward
    Ffill,
    /// Carry the next known value backward
    Bfill,
    /// Linear interpolation between known values
    Interpolate,
    /// Use K-Nearest Neighbors imputation
    Knn,
    /// Leave missing values as-is
    Keep,
}

impl From<CliNumericStrategy> for NumericStrategy {
    fn from(cli: CliNumericStrategy) -> Self {
        match cli {
            CliNumericStrategy::Drop => NumericStrategy::Drop,
            CliNumericStrategy::Mean => NumericStrategy::Mean,
            CliNumericStrategy::Median => NumericStrategy::Median,
            CliNumericStrategy::Constant => NumericStrategy::Constant,
            CliNumericStrategy::Ffill => NumericStrategy::ForwardFill,
            CliNumericStrategy::Bfill => NumericStrategy::BackwardFill,
            CliNumericStrategy::Interpolate => NumericStrategy::Interpolate,
            CliNumericStrategy::Knn => NumericStrategy::Knn,
            CliNumericStrategy::Keep => NumericStrategy::Keep,
        }
    }
}

/// CLI-compatible categorical strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCategoricalStrategy {
    /// Drop rows with missing values
    Drop,
    /// Use the most frequent value (mode)
    Mode,
    /// Use the value given by --fill-text
    Constant,
    /// Add a placeholder category (see --placeholder)
    Placeholder,
    /// Carry the last known value forward
    Ffill,
    /// Carry the next known value backward
    Bfill,
    /// Leave missing values as-is
    Keep,
}

impl From<CliCategoricalStrategy> for CategoricalStrategy {
    fn from(cli: CliCategoricalStrategy) -> Self {
        match cli {
            CliCategoricalStrategy::Drop => CategoricalStrategy::Drop,
            CliCategoricalStrategy::Mode => CategoricalStrategy::Mode,
            CliCategoricalStrategy::Constant => CategoricalStrategy::Constant,
            CliCategoricalStrategy::Placeholder => CategoricalStrategy::Placeholder,
            CliCategoricalStrategy::Ffill => CategoricalStrategy::ForwardFill,
            CliCategoricalStrategy::Bfill => CategoricalStrategy::BackwardFill,
            CliCategoricalStrategy::Keep => CategoricalStrategy::Keep,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Detect and impute missing values in CSV datasets",
    long_about = "Detect and impute missing values in CSV datasets.\n\n\
                  EXAMPLES:\n  \
                  # Show where values are missing\n  \
                  lex-imputation -i data.csv --report-only\n\n  \
                  # Interpolate numbers, mark missing categories\n  \
                  lex-imputation -i data.csv --numeric interpolate --categorical placeholder\n\n  \
                  # Write the result and emit JSON\n  \
                  lex-imputation -i data.csv -o clean.csv --json"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Path of the CSV file to write the processed data to
    #[arg(short, long)]
    output: Option<String>,

    /// Strategy for numeric columns
    #[arg(long, value_enum, default_value = "median")]
    numeric: CliNumericStrategy,

    /// Strategy for categorical (string) columns
    #[arg(long, value_enum, default_value = "mode")]
    categorical: CliCategoricalStrategy,

    /// Fill value for `--numeric constant`
    #[arg(long, default_value = "0.0")]
    fill_value: f64,

    /// Fill value for `--categorical constant`
    #[arg(long, default_value = "Unknown")]
    fill_text: String,

    /// Category label for `--categorical placeholder`
    #[arg(long, default_value = "Missing")]
    placeholder: String,

    /// Number of neighbors for KNN imputation
    #[arg(long, default_value = "5")]
    knn_neighbors: usize,

    /// Maximum consecutive values filled by ffill/bfill
    #[arg(long)]
    fill_limit: Option<usize>,

    /// Drop columns whose missing fraction exceeds this value (0.0 - 1.0)
    #[arg(long)]
    column_threshold: Option<f64>,

    /// Drop rows whose missing fraction exceeds this value (0.0 - 1.0)
    #[arg(long)]
    row_threshold: Option<f64>,

    /// Only print the missing value report, do not impute
    #[arg(long)]
    report_only: bool,

    /// Output JSON to stdout instead of human-readable summary
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    if args.report_only {
        let report = MissingValueAnalyzer::analyze(&data);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        return Ok(());
    }

    let config = build_config(&args)?;
    let outcome = MissingValueHandler::new(config).handle(data)?;

    if let Some(ref output) = args.output {
        let mut data = outcome.data.clone();
        write_csv(&mut data, output)?;
        info!("Processed data written to: {}", output);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<ImputationConfig> {
    let mut builder = ImputationConfig::builder()
        .numeric_strategy(args.numeric.into())
        .categorical_strategy(args.categorical.into())
        .numeric_fill_value(args.fill_value)
        .string_fill_value(&args.fill_text)
        .placeholder_label(&args.placeholder)
        .knn_neighbors(args.knn_neighbors);

    if let Some(limit) = args.fill_limit {
        builder = builder.fill_limit(limit);
    }
    if let Some(threshold) = args.column_threshold {
        builder = builder.column_drop_threshold(threshold);
    }
    if let Some(threshold) = args.row_threshold {
        builder = builder.row_drop_threshold(threshold);
    }

    let config = builder.build()?;
    debug!("Using configuration: {:?}", config);
    Ok(config)
}

/// Print a missing value report as a table.
///
/// Uses `println!` intentionally: this is the command's primary output and
/// must be visible regardless of log level.
fn print_report(report: &MissingValueReport) {
    println!("\n{}", "=".repeat(60));
    println!("MISSING VALUE REPORT");
    println!("{}", "=".repeat(60));
    println!(
        "Rows: {} ({} complete, {} with missing values)",
        report.total_rows, report.complete_rows, report.rows_with_missing
    );
    println!(
        "Missing cells: {} of {} ({:.1}%)",
        report.total_missing,
        report.total_rows * report.total_columns,
        report.missing_percentage
    );
    println!();
    println!(
        "{:<24} {:<12} {:<10} {:<10}",
        "Column", "Type", "Missing", "Missing %"
    );
    println!("{}", "-".repeat(60));
    for col in &report.columns {
        println!(
            "{:<24} {:<12} {:<10} {:<10.1}",
            truncate_str(&col.name, 23),
            col.category,
            col.missing_count,
            col.missing_percentage
        );
    }
    println!();
}

/// Print the processed data and the actions taken.
fn print_outcome(outcome: &ImputationOutcome) {
    print_report(&outcome.report_before);

    println!("ACTIONS TAKEN");
    println!("{}", "-".repeat(60));
    if outcome.actions.is_empty() {
        println!("  (none)");
    }
    for action in &outcome.actions {
        println!("  - {}", action);
    }
    println!();

    println!("RESULT");
    println!("{}", "-".repeat(60));
    println!("{}", outcome.data);
    println!(
        "Missing cells: {} -> {} ({}ms)",
        outcome.report_before.total_missing, outcome.report_after.total_missing, outcome.duration_ms
    );
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Load a CSV file, retrying without quote handling if the first pass fails.
fn load_csv(path: &str) -> Result<DataFrame> {
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| e.into())
}

fn write_csv(df: &mut DataFrame, path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
