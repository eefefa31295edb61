//! Ranking evaluated models against each other

use serde::Serialize;

use super::evaluate::Evaluation;
use super::models::ModelKind;

/// Minority share below which `Auto` ranks by precision-recall area
pub const DEFAULT_IMBALANCE_THRESHOLD: f64 = 0.2;

/// Metric requested for ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankMetric {
    /// ROC area, or PR area when the labels are imbalanced
    #[default]
    Auto,
    RocAuc,
    PrAuc,
}

impl RankMetric {
    /// Concrete metric for a given minority share; never returns `Auto`
    pub fn resolve(self, minority_rate: f64, imbalance_threshold: f64) -> RankMetric {
        match self {
            RankMetric::Auto if minority_rate < imbalance_threshold => RankMetric::PrAuc,
            RankMetric::Auto => RankMetric::RocAuc,
            explicit => explicit,
        }
    }

    fn score(self, evaluation: &Evaluation) -> f64 {
        match self {
            RankMetric::PrAuc => evaluation.pr_auc(),
            _ => evaluation.roc_auc(),
        }
    }
}

impl std::fmt::Display for RankMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankMetric::Auto => write!(f, "auto"),
            RankMetric::RocAuc => write!(f, "ROC AUC"),
            RankMetric::PrAuc => write!(f, "PR AUC"),
        }
    }
}

impl std::str::FromStr for RankMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(RankMetric::Auto),
            "roc" | "roc-auc" | "auc" => Ok(RankMetric::RocAuc),
            "pr" | "pr-auc" | "precision-recall" => Ok(RankMetric::PrAuc),
            _ => Err(format!("Unknown ranking metric: '{}'. Use auto, roc or pr.", s)),
        }
    }
}

/// One row of the ranking
#[derive(Debug, Clone, Serialize)]
pub struct RankedModel {
    /// 1-based position
    pub rank: usize,
    pub model: ModelKind,
    pub score: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub metric: RankMetric,
    pub minority_rate: f64,
    pub entries: Vec<RankedModel>,
}

impl Ranking {
    pub fn best(&self) -> Option<&RankedModel> {
        self.entries.first()
    }
}

/// Order evaluations by the resolved metric.
///
/// Total order: metric descending, then accuracy descending, then the
/// declaration order of `ModelKind`.
pub fn rank_models(
    evaluations: &[Evaluation],
    metric: RankMetric,
    minority_rate: f64,
    imbalance_threshold: f64,
) -> Ranking {
    let resolved = metric.resolve(minority_rate, imbalance_threshold);

    let mut ordered: Vec<&Evaluation> = evaluations.iter().collect();
    ordered.sort_by(|a, b| {
        resolved
            .score(b)
            .total_cmp(&resolved.score(a))
            .then_with(|| b.accuracy.estimate.total_cmp(&a.accuracy.estimate))
            .then_with(|| a.model.cmp(&b.model))
    });

    let entries = ordered
        .into_iter()
        .enumerate()
        .map(|(i, e)| RankedModel {
            rank: i + 1,
            model: e.model,
            score: resolved.score(e),
            accuracy: e.accuracy.estimate,
        })
        .collect();

    Ranking {
        metric: resolved,
        minority_rate,
        entries,
    }
}
