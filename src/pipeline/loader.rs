//! Dataset loader for delimited text and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::error::DataError;
use crate::utils::{create_spinner, finish_with_success};

/// Default token that marks an absent attribute value in raw files
pub const DEFAULT_MISSING_TOKEN: &str = "?";

/// Column order of the headerless Wisconsin breast-cancer file
pub const WISCONSIN_COLUMNS: [&str; 11] = [
    "id",
    "clump_thickness",
    "cell_size_uniformity",
    "cell_shape_uniformity",
    "marginal_adhesion",
    "epithelial_cell_size",
    "bare_nuclei",
    "bland_chromatin",
    "normal_nucleoli",
    "mitoses",
    "class",
];

/// How a raw file should be read
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether the first line holds column names
    pub has_header: bool,
    /// Column names applied in order when the file has no header
    pub column_names: Option<Vec<String>>,
    /// Token converted to an absent (null) value
    pub missing_token: String,
    /// Rows used for schema inference (0 = full scan)
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            column_names: None,
            missing_token: DEFAULT_MISSING_TOKEN.to_string(),
            infer_schema_length: 10_000,
        }
    }
}

/// Build a lazy scan over a file (CSV or Parquet based on extension)
fn scan_dataset(path: &Path, options: &LoadOptions) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if options.infer_schema_length == 0 {
        None
    } else {
        Some(options.infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" | "data" | "txt" => LazyCsvReader::new(path)
            .with_has_header(options.has_header)
            .with_null_values(Some(NullValues::AllColumnsSingle(
                options.missing_token.as_str().into(),
            )))
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, data, txt, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load a dataset fully into memory, applying explicit column names when given.
///
/// Sentinel tokens in delimited files become nulls; cleaning decides what to
/// do with them.
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let mut df = scan_dataset(path, options)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    if let Some(names) = &options.column_names {
        if names.len() != df.width() {
            return Err(DataError::ColumnCountMismatch {
                expected: names.len(),
                actual: df.width(),
            }
            .into());
        }
        df.set_column_names(names.iter().map(|s| s.as_str()))
            .context("Failed to apply column names")?;
    }

    Ok(df)
}

/// Load a dataset behind a spinner, returning the frame with its shape
pub fn load_dataset_with_progress(
    path: &Path,
    options: &LoadOptions,
) -> Result<(DataFrame, usize, usize)> {
    let spinner = create_spinner(&format!("Reading {}...", path.display()));
    let df = load_dataset(path, options)?;
    let (rows, cols) = df.shape();
    finish_with_success(&spinner, &format!("Loaded {} rows × {} columns", rows, cols));
    Ok((df, rows, cols))
}

/// Read only the column names of a file (schema scan, no data collection)
pub fn get_column_names(path: &Path, options: &LoadOptions) -> Result<Vec<String>> {
    if let Some(names) = &options.column_names {
        return Ok(names.clone());
    }
    let schema = scan_dataset(path, options)?
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}
