//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{
    CleaningOptions, ComparisonConfig, KnnSearch, LabelEncoding, LoadOptions, ModelKind,
    RankMetric, TrainingConfig, WISCONSIN_COLUMNS,
};

/// Biclass - Fit several binary classifiers on one dataset and rank them on held-out data
#[derive(Parser, Debug)]
#[command(name = "biclass")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV/.data/.txt or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Label column name
    #[arg(short, long, default_value = "class")]
    pub target: String,

    /// The file has no header row. Column names come from --columns,
    /// or the Wisconsin breast-cancer layout when --columns is not given.
    #[arg(long, default_value = "false")]
    pub no_header: bool,

    /// Column names to apply in order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Token that marks an absent attribute value
    #[arg(long, default_value = "?")]
    pub missing_token: String,

    /// Identifier columns to remove before analysis (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "id")]
    pub drop_columns: Vec<String>,

    /// Label value of the positive class
    #[arg(long, default_value = "4")]
    pub positive_code: String,

    /// Label value of the negative class
    #[arg(long, default_value = "2")]
    pub negative_code: String,

    /// Display name of the positive class
    #[arg(long, default_value = "malignant")]
    pub positive_name: String,

    /// Display name of the negative class
    #[arg(long, default_value = "benign")]
    pub negative_name: String,

    /// Share of records used for training, strictly between 0 and 1
    #[arg(long, default_value = "0.7", value_parser = validate_open_unit)]
    pub train_fraction: f64,

    /// Seed for the train/test split and cross-validation folds
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Models to fit (comma-separated): logistic, knn, lda, qda, naive-bayes
    #[arg(long, value_delimiter = ',', default_value = "logistic,knn,lda,qda,naive-bayes")]
    pub models: Vec<ModelKind>,

    /// Smallest neighbor count tried by k-nearest neighbors
    #[arg(long, default_value = "1", value_parser = validate_positive)]
    pub k_min: usize,

    /// Largest neighbor count tried by k-nearest neighbors
    #[arg(long, default_value = "25", value_parser = validate_positive)]
    pub k_max: usize,

    /// Cross-validation folds used to choose the neighbor count
    #[arg(long, default_value = "10", value_parser = validate_folds)]
    pub folds: usize,

    /// Ranking metric: "auto" (PR AUC when imbalanced, ROC AUC otherwise), "roc" or "pr"
    #[arg(long, default_value = "auto")]
    pub rank_by: RankMetric,

    /// Minority-class share below which "auto" ranks by PR AUC
    #[arg(long, default_value = "0.2", value_parser = validate_imbalance)]
    pub imbalance_threshold: f64,

    /// Confidence level of the accuracy interval
    #[arg(long, default_value = "0.95", value_parser = validate_open_unit)]
    pub confidence: f64,

    /// Drop one predictor from each pair with |correlation| above this value.
    /// Correlations are computed on the training partition only.
    #[arg(long, value_parser = validate_correlation)]
    pub correlation_threshold: Option<f64>,

    /// Write a JSON report next to the input file
    #[arg(long, default_value = "false")]
    pub export: bool,

    /// JSON report path (implies --export)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// CSV path for ROC / precision-recall curve points
    #[arg(long)]
    pub curves: Option<PathBuf>,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (delimited files only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// JSON report path: explicit --report, or derived from the input when --export is set.
    /// The derived path sits next to the input with a '_comparison.json' suffix.
    pub fn report_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.report {
            return Some(path.clone());
        }
        if !self.export {
            return None;
        }
        Some(derived_path(&self.input, "_comparison.json"))
    }

    pub fn curves_path(&self) -> Option<&Path> {
        self.curves.as_deref()
    }

    /// Column names to apply, if any
    pub fn column_names(&self) -> Option<Vec<String>> {
        if !self.columns.is_empty() {
            Some(self.columns.clone())
        } else if self.no_header {
            Some(WISCONSIN_COLUMNS.iter().map(|s| s.to_string()).collect())
        } else {
            None
        }
    }

    /// Build the library configuration, checking cross-field constraints
    pub fn to_config(&self) -> Result<ComparisonConfig, String> {
        if self.k_min > self.k_max {
            return Err(format!(
                "--k-min ({}) must not exceed --k-max ({})",
                self.k_min, self.k_max
            ));
        }
        if self.positive_code == self.negative_code {
            return Err(format!(
                "--positive-code and --negative-code must differ (both '{}')",
                self.positive_code
            ));
        }
        if self.drop_columns.iter().any(|c| c == &self.target) {
            return Err(format!("Label column '{}' cannot be dropped", self.target));
        }

        let mut models: Vec<ModelKind> = Vec::new();
        for model in &self.models {
            if !models.contains(model) {
                models.push(*model);
            }
        }
        if models.is_empty() {
            return Err("At least one model is required".to_string());
        }

        Ok(ComparisonConfig {
            load: LoadOptions {
                has_header: !self.no_header,
                column_names: self.column_names(),
                missing_token: self.missing_token.clone(),
                infer_schema_length: self.infer_schema_length,
            },
            cleaning: CleaningOptions {
                target: self.target.clone(),
                drop_columns: self
                    .drop_columns
                    .iter()
                    .filter(|c| !c.trim().is_empty())
                    .cloned()
                    .collect(),
                encoding: LabelEncoding::new(
                    self.positive_code.clone(),
                    self.negative_code.clone(),
                    self.positive_name.clone(),
                    self.negative_name.clone(),
                ),
            },
            train_fraction: self.train_fraction,
            seed: self.seed,
            models,
            training: TrainingConfig {
                knn: KnnSearch {
                    k_min: self.k_min,
                    k_max: self.k_max,
                    folds: self.folds,
                    seed: self.seed,
                },
            },
            rank_by: self.rank_by,
            imbalance_threshold: self.imbalance_threshold,
            confidence: self.confidence,
            correlation_threshold: self.correlation_threshold,
        })
    }
}

fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("biclass");
    parent.join(format!("{}{}", stem, suffix))
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for values strictly between 0 and 1
fn validate_open_unit(s: &str) -> Result<f64, String> {
    let value: f64 = parse_number(s)?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("value must be strictly between 0.0 and 1.0, got {}", value))
    }
}

/// Validator for imbalance_threshold parameter
fn validate_imbalance(s: &str) -> Result<f64, String> {
    let value: f64 = parse_number(s)?;
    if (0.0..=0.5).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "imbalance_threshold must be between 0.0 and 0.5, got {}",
            value
        ))
    }
}

/// Validator for correlation_threshold parameter
fn validate_correlation(s: &str) -> Result<f64, String> {
    let value: f64 = parse_number(s)?;
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!(
            "correlation_threshold must be in (0.0, 1.0], got {}",
            value
        ))
    }
}

fn validate_positive(s: &str) -> Result<usize, String> {
    let value: usize = parse_number(s)?;
    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

fn validate_folds(s: &str) -> Result<usize, String> {
    let value: usize = parse_number(s)?;
    if value < 2 {
        Err(format!("folds must be at least 2, got {}", value))
    } else {
        Ok(value)
    }
}
