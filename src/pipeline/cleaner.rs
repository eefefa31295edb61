//! Raw table → complete-case `Dataset`
//!
//! Cleaning order matters: identifier columns are removed first, then every
//! label is validated (so a bad code aborts even on rows that would later be
//! dropped), and only then are incomplete records discarded.

use polars::prelude::*;
use serde::Serialize;

use super::dataset::Dataset;
use super::error::DataError;
use super::label::{encode_labels, LabelEncoding};
use super::missing::{analyze_missing_values, incomplete_record_mask};

/// What to remove and how to read the label
#[derive(Debug, Clone)]
pub struct CleaningOptions {
    /// Label column name
    pub target: String,
    /// Non-predictive identifier columns to remove
    pub drop_columns: Vec<String>,
    pub encoding: LabelEncoding,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            target: "class".to_string(),
            drop_columns: vec!["id".to_string()],
            encoding: LabelEncoding::default(),
        }
    }
}

/// Record counts produced by a cleaning pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningSummary {
    pub records_read: usize,
    pub records_dropped: usize,
    pub records_kept: usize,
    pub removed_columns: Vec<String>,
    /// Absent values per attribute column, most-missing first
    pub missing_by_column: Vec<(String, usize)>,
    pub positive_count: usize,
    pub negative_count: usize,
}

/// Produce a complete-case dataset from a raw frame.
///
/// # Errors
/// - `MissingColumn` if the target or an identifier column does not exist
/// - `UnexpectedLabel` on the first label outside the two codes
/// - `NonNumericColumn` if an attribute cannot be read as numbers
/// - `NoFeatures` / `EmptyDataset` when nothing usable is left
pub fn clean_dataset(
    df: &DataFrame,
    options: &CleaningOptions,
) -> Result<(Dataset, CleaningSummary), DataError> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for name in options.drop_columns.iter().chain(std::iter::once(&options.target)) {
        if !available.contains(name) {
            return Err(DataError::MissingColumn {
                name: name.clone(),
                available: available.clone(),
            });
        }
    }

    let labels = encode_labels(df, &options.target, &options.encoding)?;

    let feature_names: Vec<String> = available
        .iter()
        .filter(|name| **name != options.target && !options.drop_columns.contains(name))
        .cloned()
        .collect();

    if feature_names.is_empty() {
        return Err(DataError::NoFeatures);
    }

    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(feature_names.len());
    for name in &feature_names {
        columns.push(numeric_values(df.column(name)?, name)?);
    }

    let missing_by_column = analyze_missing_values(df, &feature_names)?;
    let incomplete = incomplete_record_mask(df, &feature_names)?;

    let mut rows = Vec::with_capacity(df.height());
    let mut kept_labels = Vec::with_capacity(df.height());
    for (row_idx, &is_incomplete) in incomplete.iter().enumerate() {
        if is_incomplete {
            continue;
        }
        // Complete rows have a value in every column
        let row: Option<Vec<f64>> = columns.iter().map(|col| col[row_idx]).collect();
        if let Some(row) = row {
            rows.push(row);
            kept_labels.push(labels[row_idx]);
        }
    }

    if rows.is_empty() {
        return Err(DataError::EmptyDataset);
    }

    let dataset = Dataset::new(feature_names, rows, kept_labels, options.encoding.class_names());

    let summary = CleaningSummary {
        records_read: df.height(),
        records_dropped: df.height() - dataset.len(),
        records_kept: dataset.len(),
        removed_columns: options.drop_columns.clone(),
        missing_by_column,
        positive_count: dataset.positive_count(),
        negative_count: dataset.negative_count(),
    };

    Ok((dataset, summary))
}

/// Read an attribute column as floats, NaN treated as absent.
///
/// A column made only of sentinel tokens has no inferred numeric type; it is
/// accepted as all-absent.
fn numeric_values(column: &Column, name: &str) -> Result<Vec<Option<f64>>, DataError> {
    let all_absent = column.null_count() == column.len();
    if !column.dtype().is_primitive_numeric() && !all_absent {
        return Err(DataError::NonNumericColumn {
            name: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }
    if all_absent {
        return Ok(vec![None; column.len()]);
    }

    let float_col = column.cast(&DataType::Float64)?;
    Ok(float_col
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_frame() -> DataFrame {
        df! {
            "id" => [1001i64, 1002, 1003, 1004, 1005],
            "thickness" => [5i64, 3, 8, 1, 10],
            "bare_nuclei" => [Some(1i64), None, Some(10), Some(1), Some(7)],
            "class" => [2i64, 2, 4, 2, 4],
        }
        .unwrap()
    }

    #[test]
    fn test_clean_drops_incomplete_and_identifier() {
        let (ds, summary) = clean_dataset(&raw_frame(), &CleaningOptions::default()).unwrap();

        assert_eq!(ds.feature_names(), &["thickness".to_string(), "bare_nuclei".to_string()]);
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.labels(), &[false, true, false, true]);
        assert_eq!(ds.row(1), &[8.0, 10.0]);

        assert_eq!(summary.records_read, 5);
        assert_eq!(summary.records_dropped, 1);
        assert_eq!(summary.records_kept, 4);
        assert_eq!(summary.positive_count, 2);
        assert_eq!(summary.negative_count, 2);
        assert_eq!(summary.missing_by_column[0], ("bare_nuclei".to_string(), 1));
    }

    #[test]
    fn test_bad_label_on_incomplete_row_still_fails() {
        let df = df! {
            "x" => [Some(1.0f64), None],
            "class" => [2i64, 9],
        }
        .unwrap();
        let options = CleaningOptions {
            drop_columns: vec![],
            ..Default::default()
        };
        let err = clean_dataset(&df, &options).unwrap_err();
        assert!(matches!(err, DataError::UnexpectedLabel { row: 1, .. }));
    }

    #[test]
    fn test_unknown_identifier_column_is_error() {
        let options = CleaningOptions {
            drop_columns: vec!["patient_id".to_string()],
            ..Default::default()
        };
        let err = clean_dataset(&raw_frame(), &options).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref name, .. } if name == "patient_id"));
    }

    #[test]
    fn test_non_numeric_attribute_is_error() {
        let df = df! {
            "colour" => ["red", "blue"],
            "class" => [2i64, 4],
        }
        .unwrap();
        let options = CleaningOptions {
            drop_columns: vec![],
            ..Default::default()
        };
        let err = clean_dataset(&df, &options).unwrap_err();
        assert!(matches!(err, DataError::NonNumericColumn { .. }));
    }

    #[test]
    fn test_all_rows_incomplete_is_empty_dataset() {
        let df = df! {
            "x" => [None::<f64>, None],
            "class" => [2i64, 4],
        }
        .unwrap();
        let options = CleaningOptions {
            drop_columns: vec![],
            ..Default::default()
        };
        let err = clean_dataset(&df, &options).unwrap_err();
        assert!(matches!(err, DataError::EmptyDataset));
    }

    #[test]
    fn test_only_label_column_has_no_features() {
        let df = df! {
            "id" => [1i64, 2],
            "class" => [2i64, 4],
        }
        .unwrap();
        let err = clean_dataset(&df, &CleaningOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::NoFeatures));
    }
}
