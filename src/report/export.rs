//! JSON export of a comparison run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::summary::StepTimings;
use crate::pipeline::{
    CleaningSummary, CorrelatedPair, Evaluation, KnnSelection, Ranking, SettingsSnapshot,
    SplitSummary,
};

/// Report metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    pub biclass_version: String,
    pub input_file: String,
}

/// Predictors removed as redundant before training
#[derive(Debug, Clone, Serialize)]
pub struct RedundancyEntry {
    pub threshold: f64,
    pub pairs: Vec<CorrelatedPair>,
    pub dropped: Vec<String>,
}

/// Per-model results
#[derive(Debug, Clone, Serialize)]
pub struct ModelReportEntry {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    /// Cross-validation scores of the neighbor-count search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knn_selection: Option<KnnSelection>,
}

/// Timing information in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingInfo {
    pub load_ms: u64,
    pub clean_ms: u64,
    pub split_ms: u64,
    pub train_ms: u64,
    pub evaluate_ms: u64,
    pub total_ms: u64,
}

impl From<&StepTimings> for TimingInfo {
    fn from(timings: &StepTimings) -> Self {
        Self {
            load_ms: timings.load.as_millis() as u64,
            clean_ms: timings.clean.as_millis() as u64,
            split_ms: timings.split.as_millis() as u64,
            train_ms: timings.train.as_millis() as u64,
            evaluate_ms: timings.evaluate.as_millis() as u64,
            total_ms: timings.total().as_millis() as u64,
        }
    }
}

/// Complete comparison report
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub metadata: ReportMetadata,
    pub settings: SettingsSnapshot,
    pub cleaning: CleaningSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redundancy: Option<RedundancyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitSummary>,
    pub models: Vec<ModelReportEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Ranking>,
    pub timing: TimingInfo,
}

/// Builder for collecting report sections while the pipeline runs
pub struct ComparisonReportBuilder {
    input_file: String,
    settings: SettingsSnapshot,
    cleaning: CleaningSummary,
    redundancy: Option<RedundancyEntry>,
    split: Option<SplitSummary>,
    models: Vec<ModelReportEntry>,
    ranking: Option<Ranking>,
    timing: TimingInfo,
}

impl ComparisonReportBuilder {
    pub fn new(input_file: impl Into<String>, settings: SettingsSnapshot) -> Self {
        Self {
            input_file: input_file.into(),
            settings,
            cleaning: CleaningSummary::default(),
            redundancy: None,
            split: None,
            models: Vec::new(),
            ranking: None,
            timing: TimingInfo::default(),
        }
    }

    pub fn set_cleaning(&mut self, summary: &CleaningSummary) {
        self.cleaning = summary.clone();
    }

    pub fn set_redundancy(&mut self, threshold: f64, pairs: &[CorrelatedPair], dropped: &[String]) {
        self.redundancy = Some(RedundancyEntry {
            threshold,
            pairs: pairs.to_vec(),
            dropped: dropped.to_vec(),
        });
    }

    pub fn set_split(&mut self, summary: SplitSummary) {
        self.split = Some(summary);
    }

    pub fn add_model(&mut self, evaluation: &Evaluation, selection: Option<&KnnSelection>) {
        self.models.push(ModelReportEntry {
            evaluation: evaluation.clone(),
            knn_selection: selection.cloned(),
        });
    }

    pub fn set_ranking(&mut self, ranking: &Ranking) {
        self.ranking = Some(ranking.clone());
    }

    pub fn set_timing(&mut self, timings: &StepTimings) {
        self.timing = TimingInfo::from(timings);
    }

    pub fn build(self) -> ComparisonReport {
        ComparisonReport {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                biclass_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: self.input_file,
            },
            settings: self.settings,
            cleaning: self.cleaning,
            redundancy: self.redundancy,
            split: self.split,
            models: self.models,
            ranking: self.ranking,
            timing: self.timing,
        }
    }
}

/// Export the comparison report to a JSON file
pub fn export_comparison_report(report: &ComparisonReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize comparison report to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write comparison report to {}",
            output_path.display()
        )
    })?;

    Ok(())
}
