//! Classifier variants and the training entry point
//!
//! Every variant sees predictors standardized with statistics from the
//! training partition only. `TrainedModel` keeps that scaler next to the
//! fitted parameters so test records are transformed the same way.

pub mod discriminant;
pub mod knn;
pub mod linalg;
pub mod logistic;
pub mod naive_bayes;

use serde::Serialize;

use super::dataset::Dataset;
use super::error::ModelError;
use super::scaler::StandardScaler;

pub use discriminant::{CovarianceKind, DiscriminantAnalysis};
pub use knn::{select_neighbor_count, CandidateScore, KnnClassifier, KnnSearch, KnnSelection};
pub use logistic::LogisticRegression;
pub use naive_bayes::GaussianNaiveBayes;

/// Probability cut-off for point predictions
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Supported classifier variants, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    LogisticRegression,
    KNearestNeighbors,
    LinearDiscriminant,
    QuadraticDiscriminant,
    NaiveBayes,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::LogisticRegression,
        ModelKind::KNearestNeighbors,
        ModelKind::LinearDiscriminant,
        ModelKind::QuadraticDiscriminant,
        ModelKind::NaiveBayes,
    ];

    /// Human-readable name for reports
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "Logistic regression",
            ModelKind::KNearestNeighbors => "k-nearest neighbors",
            ModelKind::LinearDiscriminant => "Linear discriminant",
            ModelKind::QuadraticDiscriminant => "Quadratic discriminant",
            ModelKind::NaiveBayes => "Naive Bayes",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::LogisticRegression => write!(f, "logistic"),
            ModelKind::KNearestNeighbors => write!(f, "knn"),
            ModelKind::LinearDiscriminant => write!(f, "lda"),
            ModelKind::QuadraticDiscriminant => write!(f, "qda"),
            ModelKind::NaiveBayes => write!(f, "naive-bayes"),
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logistic" | "glm" | "logit" => Ok(ModelKind::LogisticRegression),
            "knn" => Ok(ModelKind::KNearestNeighbors),
            "lda" => Ok(ModelKind::LinearDiscriminant),
            "qda" => Ok(ModelKind::QuadraticDiscriminant),
            "naive-bayes" | "nb" | "bayes" => Ok(ModelKind::NaiveBayes),
            _ => Err(format!(
                "Unknown model: '{}'. Use logistic, knn, lda, qda or naive-bayes.",
                s
            )),
        }
    }
}

/// Settings that affect how models are fit
#[derive(Debug, Clone, Default)]
pub struct TrainingConfig {
    pub knn: KnnSearch,
}

/// Point prediction for one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Estimated probability of the positive class
    pub probability: f64,
    /// Class decision at the 0.5 threshold
    pub positive: bool,
}

impl Prediction {
    /// Decision by threshold alone; exactly 0.5 falls to the negative class
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            positive: probability > DECISION_THRESHOLD,
        }
    }
}

/// Fitted parameters of one variant
#[derive(Debug, Clone)]
pub enum FittedModel {
    Logistic(LogisticRegression),
    Knn(KnnClassifier),
    Discriminant(DiscriminantAnalysis),
    NaiveBayes(GaussianNaiveBayes),
}

impl FittedModel {
    /// Predict a record that is already standardized
    pub fn predict(&self, x: &[f64]) -> Prediction {
        match self {
            FittedModel::Logistic(m) => Prediction::from_probability(m.probability(x)),
            FittedModel::Knn(m) => m.predict(x),
            FittedModel::Discriminant(m) => Prediction::from_probability(m.probability(x)),
            FittedModel::NaiveBayes(m) => Prediction::from_probability(m.probability(x)),
        }
    }
}

/// A fitted model together with the training-set scaler
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub kind: ModelKind,
    pub scaler: StandardScaler,
    pub model: FittedModel,
    /// Cross-validation results for the neighbor-count search
    pub selection: Option<KnnSelection>,
}

impl TrainedModel {
    /// Predict a raw (unscaled) record
    pub fn predict(&self, row: &[f64]) -> Prediction {
        self.model.predict(&self.scaler.transform_row(row))
    }

    pub fn predict_all(&self, data: &Dataset) -> Vec<Prediction> {
        data.rows().iter().map(|row| self.predict(row)).collect()
    }

    /// Short description of tuned or diagnostic parameters
    pub fn details(&self) -> String {
        match &self.model {
            FittedModel::Logistic(m) if !m.converged => {
                format!("did not converge after {} iterations", m.iterations)
            }
            FittedModel::Logistic(m) => format!("converged in {} iterations", m.iterations),
            FittedModel::Knn(m) => format!("k = {}", m.k),
            FittedModel::Discriminant(m) => match m.kind {
                CovarianceKind::Pooled => "pooled covariance".to_string(),
                CovarianceKind::PerClass => "per-class covariance".to_string(),
            },
            FittedModel::NaiveBayes(_) => "gaussian likelihoods".to_string(),
        }
    }
}

/// Fit one model variant on a training partition.
///
/// Standardization and, for k-nearest neighbors, the neighbor-count search
/// use `train` alone.
pub fn train_model(
    kind: ModelKind,
    train: &Dataset,
    config: &TrainingConfig,
) -> Result<TrainedModel, ModelError> {
    let scaler = StandardScaler::fit(train);
    let scaled = scaler.transform(train);

    let (model, selection) = match kind {
        ModelKind::LogisticRegression => (FittedModel::Logistic(LogisticRegression::fit(&scaled)?), None),
        ModelKind::KNearestNeighbors => {
            let selection = select_neighbor_count(train, &config.knn)?;
            let model = KnnClassifier::fit(&scaled, selection.best_k);
            (FittedModel::Knn(model), Some(selection))
        }
        ModelKind::LinearDiscriminant => (
            FittedModel::Discriminant(DiscriminantAnalysis::fit(&scaled, CovarianceKind::Pooled)?),
            None,
        ),
        ModelKind::QuadraticDiscriminant => (
            FittedModel::Discriminant(DiscriminantAnalysis::fit(&scaled, CovarianceKind::PerClass)?),
            None,
        ),
        ModelKind::NaiveBayes => (FittedModel::NaiveBayes(GaussianNaiveBayes::fit(&scaled)?), None),
    };

    Ok(TrainedModel {
        kind,
        scaler,
        model,
        selection,
    })
}

/// Training rows grouped by class: index 0 = negative, 1 = positive
pub(crate) fn rows_by_class(train: &Dataset) -> [Vec<&[f64]>; 2] {
    let mut groups: [Vec<&[f64]>; 2] = [Vec::new(), Vec::new()];
    for (row, &label) in train.rows().iter().zip(train.labels()) {
        groups[label as usize].push(row.as_slice());
    }
    groups
}

/// Fail unless both classes have at least `required` training records
pub(crate) fn require_class_sizes(
    train: &Dataset,
    groups: &[Vec<&[f64]>; 2],
    required: usize,
) -> Result<(), ModelError> {
    for (class, rows) in groups.iter().enumerate() {
        if rows.len() < required {
            return Err(ModelError::InsufficientClass {
                class: train.classes().name(class == 1).to_string(),
                count: rows.len(),
                required,
            });
        }
    }
    Ok(())
}

/// Column means of a group of rows
pub(crate) fn mean_vector(rows: &[&[f64]], p: usize) -> Vec<f64> {
    let mut mean = vec![0.0; p];
    for row in rows {
        for (m, &x) in mean.iter_mut().zip(row.iter()) {
            *m += x;
        }
    }
    let n = rows.len().max(1) as f64;
    mean.iter_mut().for_each(|m| *m /= n);
    mean
}

/// Numerically stable logistic function
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::dataset::ClassNames;

    fn separable() -> Dataset {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            let t = i as f64 / 20.0;
            rows.push(vec![t, 1.0 - t * 0.5 + (i % 3) as f64 * 0.1]);
            labels.push(false);
            rows.push(vec![3.0 + t, 2.0 + t * 0.3 + (i % 4) as f64 * 0.1]);
            labels.push(true);
        }
        Dataset::new(vec!["a".into(), "b".into()], rows, labels, ClassNames::new("pos", "neg"))
    }

    #[test]
    fn test_model_kind_round_trip_names() {
        for kind in ModelKind::ALL {
            let parsed: ModelKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert_eq!("GLM".parse::<ModelKind>().unwrap(), ModelKind::LogisticRegression);
        assert!("svm".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_prediction_threshold_is_strict() {
        assert!(!Prediction::from_probability(0.5).positive);
        assert!(Prediction::from_probability(0.5001).positive);
    }

    #[test]
    fn test_every_variant_trains_and_separates() {
        let train = separable();
        let config = TrainingConfig {
            knn: KnnSearch {
                k_min: 1,
                k_max: 5,
                folds: 4,
                seed: 3,
            },
        };
        for kind in ModelKind::ALL {
            let model = train_model(kind, &train, &config).unwrap();
            assert_eq!(model.kind, kind);
            assert!(model.predict(&[3.5, 2.2]).positive, "{} positive", kind);
            assert!(!model.predict(&[0.2, 0.9]).positive, "{} negative", kind);
            let p = model.predict(&[1.7, 1.5]).probability;
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_scaler_comes_from_training_partition() {
        let train = separable();
        let model = train_model(ModelKind::NaiveBayes, &train, &TrainingConfig::default()).unwrap();
        assert_eq!(model.scaler, StandardScaler::fit(&train));
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(!sigmoid(-800.0).is_nan());
    }

    #[test]
    fn test_missing_class_is_error() {
        let train = Dataset::new(
            vec!["a".into()],
            vec![vec![1.0], vec![2.0], vec![3.0]],
            vec![false, false, false],
            ClassNames::new("pos", "neg"),
        );
        let err = train_model(ModelKind::LinearDiscriminant, &train, &TrainingConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::InsufficientClass { ref class, .. } if class == "pos"));
    }
}
