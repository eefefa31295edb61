//! Label column encoding
//!
//! Raw files store the outcome as a code (e.g. `2` = benign, `4` = malignant).
//! This module maps those codes onto the two named classes and rejects any
//! value outside the two expected codes.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::dataset::ClassNames;
use super::error::DataError;

/// Mapping from raw label codes to the two named classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoding {
    /// Raw value that maps to the positive class
    pub positive_code: String,
    /// Raw value that maps to the negative class
    pub negative_code: String,
    pub positive_name: String,
    pub negative_name: String,
}

impl LabelEncoding {
    pub fn new(
        positive_code: impl Into<String>,
        negative_code: impl Into<String>,
        positive_name: impl Into<String>,
        negative_name: impl Into<String>,
    ) -> Self {
        Self {
            positive_code: positive_code.into(),
            negative_code: negative_code.into(),
            positive_name: positive_name.into(),
            negative_name: negative_name.into(),
        }
    }

    pub fn class_names(&self) -> ClassNames {
        ClassNames::new(self.positive_name.clone(), self.negative_name.clone())
    }
}

impl Default for LabelEncoding {
    fn default() -> Self {
        Self::new("4", "2", "malignant", "benign")
    }
}

/// Encode the label column as `true` (positive) / `false` (negative).
///
/// Fails on the first value that matches neither code; a missing label is
/// reported as `<missing>`.
pub fn encode_labels(
    df: &DataFrame,
    target: &str,
    encoding: &LabelEncoding,
) -> Result<Vec<bool>, DataError> {
    let target_col = df.column(target).map_err(|_| DataError::MissingColumn {
        name: target.to_string(),
        available: df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })?;

    let raw = column_to_string_vec(target_col)?;

    raw.into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(s) if s == encoding.positive_code => Ok(true),
            Some(s) if s == encoding.negative_code => Ok(false),
            other => Err(DataError::UnexpectedLabel {
                column: target.to_string(),
                row,
                value: other.unwrap_or_else(|| "<missing>".to_string()),
                positive: encoding.positive_code.clone(),
                negative: encoding.negative_code.clone(),
            }),
        })
        .collect()
}

/// Convert a column to a Vec of Option<String> for code comparison
fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>, PolarsError> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            // 4.0 formats as "4", so float-typed codes still match integer codes
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
