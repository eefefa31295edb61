//! Scoring fitted models against the test partition
//!
//! Point metrics come from the 0.5 decision threshold; ROC and
//! precision-recall curves sweep every threshold.

use serde::Serialize;

use super::curves::{pr_curve, roc_curve, Curve};
use super::dataset::Dataset;
use super::error::EvaluationError;
use super::models::{ModelKind, Prediction, TrainedModel};

/// Default confidence level for the accuracy interval
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Bisection steps for interval bounds (well below f64 resolution)
const BISECTION_STEPS: usize = 200;

/// Counts of predicted vs actual classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(predicted: &[bool], actual: &[bool]) -> Self {
        let mut cm = Self::default();
        for (&p, &a) in predicted.iter().zip(actual) {
            match (p, a) {
                (true, true) => cm.true_positives += 1,
                (true, false) => cm.false_positives += 1,
                (false, false) => cm.true_negatives += 1,
                (false, true) => cm.false_negatives += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn correct(&self) -> usize {
        self.true_positives + self.true_negatives
    }

    /// (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Recall of the positive class
    pub fn sensitivity(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }

    /// Positive predictive value
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn negative_predictive_value(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.sensitivity());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Share of the larger actual class: accuracy of always guessing it
    pub fn no_information_rate(&self) -> f64 {
        let positives = self.true_positives + self.false_negatives;
        let negatives = self.true_negatives + self.false_positives;
        ratio(positives.max(negatives), self.total())
    }

    /// Cohen's kappa: agreement beyond chance
    pub fn kappa(&self) -> f64 {
        let n = self.total() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let observed = self.accuracy();
        let pred_pos = (self.true_positives + self.false_positives) as f64 / n;
        let act_pos = (self.true_positives + self.false_negatives) as f64 / n;
        let expected = pred_pos * act_pos + (1.0 - pred_pos) * (1.0 - act_pos);
        if (1.0 - expected).abs() < f64::EPSILON {
            0.0
        } else {
            (observed - expected) / (1.0 - expected)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Accuracy with an exact binomial confidence interval
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AccuracyInterval {
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
}

/// Clopper-Pearson interval for `successes` out of `trials`.
///
/// The lower bound solves P(X ≥ x; n, p) = α/2 and the upper bound solves
/// P(X ≤ x; n, p) = α/2, found by bisection on the binomial tail.
pub fn binomial_interval(successes: usize, trials: usize, level: f64) -> AccuracyInterval {
    let estimate = ratio(successes, trials);
    if trials == 0 {
        return AccuracyInterval {
            estimate,
            lower: 0.0,
            upper: 1.0,
            level,
        };
    }

    let alpha = 1.0 - level;
    let ln_fact = ln_factorials(trials);

    let lower = if successes == 0 {
        0.0
    } else {
        // P(X >= x) increases with p
        bisect(|p| 1.0 - binomial_cdf(successes - 1, trials, p, &ln_fact) - alpha / 2.0, true)
    };
    let upper = if successes == trials {
        1.0
    } else {
        // P(X <= x) decreases with p
        bisect(|p| binomial_cdf(successes, trials, p, &ln_fact) - alpha / 2.0, false)
    };

    AccuracyInterval {
        estimate,
        lower,
        upper,
        level,
    }
}

/// Root of a monotone function on [0, 1]
fn bisect<F: Fn(f64) -> f64>(f: F, increasing: bool) -> f64 {
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        let above = f(mid) > 0.0;
        if above == increasing {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    0.5 * (lo + hi)
}

/// ln(k!) for k = 0..=n
fn ln_factorials(n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n + 1);
    out.push(0.0);
    for k in 1..=n {
        let prev = out[k - 1];
        out.push(prev + (k as f64).ln());
    }
    out
}

/// P(X ≤ x) for X ~ Binomial(n, p)
fn binomial_cdf(x: usize, n: usize, p: f64, ln_fact: &[f64]) -> f64 {
    if p <= 0.0 {
        return 1.0;
    }
    if p >= 1.0 {
        return if x >= n { 1.0 } else { 0.0 };
    }
    let (ln_p, ln_q) = (p.ln(), (1.0 - p).ln());
    (0..=x.min(n))
        .map(|k| {
            (ln_fact[n] - ln_fact[k] - ln_fact[n - k] + k as f64 * ln_p + (n - k) as f64 * ln_q).exp()
        })
        .sum::<f64>()
        .min(1.0)
}

/// All metrics for one model on the test partition
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub model: ModelKind,
    pub details: String,
    pub confusion: ConfusionMatrix,
    pub accuracy: AccuracyInterval,
    pub sensitivity: f64,
    pub specificity: f64,
    pub precision: f64,
    pub negative_predictive_value: f64,
    pub f1: f64,
    pub kappa: f64,
    pub no_information_rate: f64,
    pub roc: Curve,
    pub pr: Curve,
}

impl Evaluation {
    pub fn roc_auc(&self) -> f64 {
        self.roc.area
    }

    pub fn pr_auc(&self) -> f64 {
        self.pr.area
    }
}

/// Score a trained model on the test partition.
///
/// Only the scaler and parameters stored in `model` are used; nothing is
/// re-estimated from `test`.
pub fn evaluate(
    model: &TrainedModel,
    test: &Dataset,
    confidence: f64,
) -> Result<Evaluation, EvaluationError> {
    let predictions = model.predict_all(test);
    let mut evaluation = evaluate_predictions(model.kind, &predictions, test, confidence)?;
    evaluation.details = model.details();
    Ok(evaluation)
}

/// Metrics from precomputed predictions against the labels of `test`
pub fn evaluate_predictions(
    kind: ModelKind,
    predictions: &[Prediction],
    test: &Dataset,
    confidence: f64,
) -> Result<Evaluation, EvaluationError> {
    let actual = test.labels();
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(EvaluationError::InvalidConfidence(confidence));
    }
    if actual.is_empty() {
        return Err(EvaluationError::EmptyTestSet);
    }

    if let Some(row) = predictions.iter().position(|p| !p.probability.is_finite()) {
        return Err(EvaluationError::NonFiniteScore {
            model: kind.to_string(),
            row,
        });
    }

    let predicted: Vec<bool> = predictions.iter().map(|p| p.positive).collect();
    let scores: Vec<f64> = predictions.iter().map(|p| p.probability).collect();
    let confusion = ConfusionMatrix::from_predictions(&predicted, actual);

    let single_class = || EvaluationError::SingleClass {
        present: test.classes().name(actual[0]).to_string(),
    };
    let roc = roc_curve(&scores, actual).ok_or_else(single_class)?;
    let pr = pr_curve(&scores, actual).ok_or_else(single_class)?;

    Ok(Evaluation {
        model: kind,
        details: String::new(),
        accuracy: binomial_interval(confusion.correct(), confusion.total(), confidence),
        sensitivity: confusion.sensitivity(),
        specificity: confusion.specificity(),
        precision: confusion.precision(),
        negative_predictive_value: confusion.negative_predictive_value(),
        f1: confusion.f1(),
        kappa: confusion.kappa(),
        no_information_rate: confusion.no_information_rate(),
        confusion,
        roc,
        pr,
    })
}
