//! Error types for the comparison pipeline.
//!
//! Loading and cleaning failures are `DataError`, numerical fitting failures
//! are `ModelError`, and metric computation failures are `EvaluationError`.
//! The binary wraps all of them in `anyhow` with extra context.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while turning a raw table into a clean `Dataset`.
#[derive(Debug, Error)]
pub enum DataError {
    /// A column named in the configuration is not present in the table.
    #[error("Column '{name}' not found. Available columns: {available:?}")]
    MissingColumn {
        name: String,
        available: Vec<String>,
    },

    /// The label column holds a value that is neither of the two expected codes.
    ///
    /// `row` is the zero-based row index in the raw table.
    #[error("Unexpected label value '{value}' in column '{column}' at row {row}. Expected '{positive}' or '{negative}'")]
    UnexpectedLabel {
        column: String,
        row: usize,
        value: String,
        positive: String,
        negative: String,
    },

    /// An attribute column could not be interpreted as numeric.
    #[error("Attribute column '{name}' is not numeric (found {dtype})")]
    NonNumericColumn { name: String, dtype: String },

    /// The explicit column list does not match the width of a headerless file.
    #[error("Expected {expected} column names for headerless input, file has {actual} columns")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// No records survived cleaning.
    #[error("Dataset is empty after cleaning")]
    EmptyDataset,

    /// The dataset has no attribute columns left to learn from.
    #[error("Dataset has no attribute columns")]
    NoFeatures,

    /// Training fraction outside the open interval (0, 1).
    #[error("Training fraction must be between 0 and 1 (exclusive), got {0}")]
    InvalidFraction(f64),

    /// A partition or fold would contain no records.
    #[error("{0} partition would be empty")]
    EmptyPartition(&'static str),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Errors raised while fitting a model to training data.
#[derive(Debug, Error)]
pub enum ModelError {
    /// One of the two classes has no (or too few) training records.
    #[error("Class '{class}' has {count} training record(s); at least {required} required")]
    InsufficientClass {
        class: String,
        count: usize,
        required: usize,
    },

    /// A covariance matrix is not positive definite.
    #[error("Covariance matrix for {scope} is singular or not positive definite")]
    SingularCovariance { scope: String },

    /// The Newton step could not be solved.
    #[error("Hessian is singular at iteration {iteration}")]
    SingularHessian { iteration: usize },

    /// An estimate diverged to NaN or infinity.
    #[error("Non-finite estimate while fitting {model}")]
    NonFinite { model: String },

    /// The neighbor-count search range is unusable.
    #[error("Invalid neighbor range {k_min}..={k_max} for {available} training record(s) per fold")]
    InvalidNeighborRange {
        k_min: usize,
        k_max: usize,
        available: usize,
    },

    /// Cross-validation needs at least two folds.
    #[error("Cross-validation needs at least 2 folds, got {0}")]
    InvalidFolds(usize),
}

/// Errors raised while scoring a fitted model against a test partition.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Test partition is empty")]
    EmptyTestSet,

    /// ROC and PR curves need both classes to be present.
    #[error("Test partition contains only one class ({present}); curves are undefined")]
    SingleClass { present: String },

    #[error("Confidence level must be between 0 and 1 (exclusive), got {0}")]
    InvalidConfidence(f64),

    /// A model produced a NaN or infinite probability for a test record.
    ///
    /// `row` is the zero-based position within the test partition.
    #[error("Non-finite probability from {model} for test record {row}")]
    NonFiniteScore { model: String, row: usize },
}
