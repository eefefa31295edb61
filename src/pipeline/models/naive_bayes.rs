//! Gaussian naive Bayes

use serde::Serialize;

use super::{mean_vector, require_class_sizes, rows_by_class, sigmoid};
use crate::pipeline::dataset::Dataset;
use crate::pipeline::error::ModelError;

/// Share of the largest attribute variance added to every variance
const VAR_SMOOTHING: f64 = 1e-9;

/// Independent normal likelihood per attribute and class
#[derive(Debug, Clone, Serialize)]
pub struct GaussianNaiveBayes {
    /// Index 0 = negative class, 1 = positive class
    pub log_priors: [f64; 2],
    pub means: [Vec<f64>; 2],
    pub variances: [Vec<f64>; 2],
}

impl GaussianNaiveBayes {
    pub fn fit(train: &Dataset) -> Result<Self, ModelError> {
        let groups = rows_by_class(train);
        require_class_sizes(train, &groups, 1)?;

        let p = train.n_features();
        let n = train.len() as f64;

        let largest_variance = (0..p)
            .map(|j| sample_variance(&train.column(j)))
            .fold(0.0f64, f64::max);
        let epsilon = if largest_variance > 0.0 {
            VAR_SMOOTHING * largest_variance
        } else {
            VAR_SMOOTHING
        };

        let means = [mean_vector(&groups[0], p), mean_vector(&groups[1], p)];
        let variances = [0usize, 1].map(|class| {
            (0..p)
                .map(|j| {
                    let values: Vec<f64> = groups[class].iter().map(|r| r[j]).collect();
                    sample_variance(&values) + epsilon
                })
                .collect::<Vec<f64>>()
        });

        let model = Self {
            log_priors: [
                (groups[0].len() as f64 / n).ln(),
                (groups[1].len() as f64 / n).ln(),
            ],
            means,
            variances,
        };

        if model
            .variances
            .iter()
            .flatten()
            .chain(model.means.iter().flatten())
            .any(|v| !v.is_finite())
        {
            return Err(ModelError::NonFinite {
                model: "naive Bayes".to_string(),
            });
        }

        Ok(model)
    }

    fn log_joint(&self, class: usize, x: &[f64]) -> f64 {
        let log_likelihood: f64 = x
            .iter()
            .zip(&self.means[class])
            .zip(&self.variances[class])
            .map(|((&v, &m), &var)| {
                -0.5 * (2.0 * std::f64::consts::PI * var).ln() - (v - m).powi(2) / (2.0 * var)
            })
            .sum();
        self.log_priors[class] + log_likelihood
    }

    /// Posterior probability of the positive class for a standardized record
    pub fn probability(&self, x: &[f64]) -> f64 {
        sigmoid(self.log_joint(1, x) - self.log_joint(0, x))
    }
}

/// Sample variance (n - 1); zero for fewer than two values
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}
