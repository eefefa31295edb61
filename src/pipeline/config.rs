//! Validated settings for one comparison run

use serde::Serialize;

use super::cleaner::CleaningOptions;
use super::compare::{RankMetric, DEFAULT_IMBALANCE_THRESHOLD};
use super::evaluate::DEFAULT_CONFIDENCE;
use super::loader::LoadOptions;
use super::models::{ModelKind, TrainingConfig};
use super::split::{DEFAULT_SEED, DEFAULT_TRAIN_FRACTION};

/// Everything the library needs to run a comparison end to end
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub load: LoadOptions,
    pub cleaning: CleaningOptions,
    pub train_fraction: f64,
    pub seed: u64,
    /// Variants to fit, in reporting order
    pub models: Vec<ModelKind>,
    pub training: TrainingConfig,
    pub rank_by: RankMetric,
    pub imbalance_threshold: f64,
    pub confidence: f64,
    /// Remove one predictor of each pair with |r| above this value
    pub correlation_threshold: Option<f64>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            cleaning: CleaningOptions::default(),
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed: DEFAULT_SEED,
            models: ModelKind::ALL.to_vec(),
            training: TrainingConfig::default(),
            rank_by: RankMetric::default(),
            imbalance_threshold: DEFAULT_IMBALANCE_THRESHOLD,
            confidence: DEFAULT_CONFIDENCE,
            correlation_threshold: None,
        }
    }
}

/// Flat copy of the settings for reports
#[derive(Debug, Clone, Serialize)]
pub struct SettingsSnapshot {
    pub target: String,
    pub positive_code: String,
    pub negative_code: String,
    pub missing_token: String,
    pub drop_columns: Vec<String>,
    pub train_fraction: f64,
    pub seed: u64,
    pub models: Vec<ModelKind>,
    pub k_min: usize,
    pub k_max: usize,
    pub folds: usize,
    pub rank_by: RankMetric,
    pub imbalance_threshold: f64,
    pub confidence: f64,
    pub correlation_threshold: Option<f64>,
}

impl ComparisonConfig {
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            target: self.cleaning.target.clone(),
            positive_code: self.cleaning.encoding.positive_code.clone(),
            negative_code: self.cleaning.encoding.negative_code.clone(),
            missing_token: self.load.missing_token.clone(),
            drop_columns: self.cleaning.drop_columns.clone(),
            train_fraction: self.train_fraction,
            seed: self.seed,
            models: self.models.clone(),
            k_min: self.training.knn.k_min,
            k_max: self.training.knn.k_max,
            folds: self.training.knn.folds,
            rank_by: self.rank_by,
            imbalance_threshold: self.imbalance_threshold,
            confidence: self.confidence,
            correlation_threshold: self.correlation_threshold,
        }
    }
}
