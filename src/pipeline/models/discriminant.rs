//! Linear and quadratic discriminant analysis
//!
//! Both variants model each class as a multivariate normal and compare
//! log-posteriors. LDA shares one pooled covariance; QDA fits one per class.

use faer::Mat;
use serde::Serialize;

use super::linalg::{factorize, log_determinant, mahalanobis, scatter_matrix};
use super::{mean_vector, require_class_sizes, rows_by_class, sigmoid};
use crate::pipeline::dataset::Dataset;
use crate::pipeline::error::ModelError;

/// Covariance structure of a discriminant model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CovarianceKind {
    /// One covariance shared by both classes (linear boundary)
    Pooled,
    /// One covariance per class (quadratic boundary)
    PerClass,
}

#[derive(Debug, Clone)]
struct ClassDensity {
    log_prior: f64,
    mean: Vec<f64>,
    /// Lower Cholesky factor of the class covariance
    factor: Mat<f64>,
    log_det: f64,
}

impl ClassDensity {
    /// ln π + ln N(x; μ, Σ) up to the shared constant
    fn log_score(&self, x: &[f64]) -> f64 {
        let centred: Vec<f64> = x.iter().zip(&self.mean).map(|(a, m)| a - m).collect();
        self.log_prior - 0.5 * self.log_det - 0.5 * mahalanobis(&self.factor, &centred)
    }
}

/// Fitted Gaussian discriminant model
#[derive(Debug, Clone)]
pub struct DiscriminantAnalysis {
    pub kind: CovarianceKind,
    /// Index 0 = negative class, 1 = positive class
    classes: [ClassDensity; 2],
}

impl DiscriminantAnalysis {
    /// Estimate priors (training shares), class means and covariances.
    ///
    /// # Errors
    /// `InsufficientClass` when a class is too small to estimate its
    /// covariance; `SingularCovariance` when a covariance is not positive
    /// definite. No fallback model is substituted.
    pub fn fit(train: &Dataset, kind: CovarianceKind) -> Result<Self, ModelError> {
        let groups = rows_by_class(train);
        let p = train.n_features();
        let n = train.len() as f64;

        let required = match kind {
            CovarianceKind::Pooled => 1,
            CovarianceKind::PerClass => 2,
        };
        require_class_sizes(train, &groups, required)?;

        let means = [mean_vector(&groups[0], p), mean_vector(&groups[1], p)];
        let log_priors = [
            (groups[0].len() as f64 / n).ln(),
            (groups[1].len() as f64 / n).ln(),
        ];

        let factors: [(Mat<f64>, f64); 2] = match kind {
            CovarianceKind::Pooled => {
                if train.len() < 3 {
                    return Err(ModelError::SingularCovariance {
                        scope: "pooled classes".to_string(),
                    });
                }
                let denom = n - 2.0;
                let pooled = &scatter_matrix(&groups[0], &means[0], denom)
                    + &scatter_matrix(&groups[1], &means[1], denom);
                let factor = factorize(&pooled)
                    .map_err(|_| ModelError::SingularCovariance {
                        scope: "pooled classes".to_string(),
                    })?
                    .compute_l();
                let log_det = log_determinant(&factor);
                [(factor.clone(), log_det), (factor, log_det)]
            }
            CovarianceKind::PerClass => {
                let class_factor = |class: usize| -> Result<(Mat<f64>, f64), ModelError> {
                    let denom = groups[class].len() as f64 - 1.0;
                    let cov = scatter_matrix(&groups[class], &means[class], denom);
                    let factor = factorize(&cov)
                        .map_err(|_| ModelError::SingularCovariance {
                            scope: format!("class '{}'", train.classes().name(class == 1)),
                        })?
                        .compute_l();
                    let log_det = log_determinant(&factor);
                    Ok((factor, log_det))
                };
                [class_factor(0)?, class_factor(1)?]
            }
        };

        let [(neg_factor, neg_log_det), (pos_factor, pos_log_det)] = factors;
        let [neg_mean, pos_mean] = means;

        Ok(Self {
            kind,
            classes: [
                ClassDensity {
                    log_prior: log_priors[0],
                    mean: neg_mean,
                    factor: neg_factor,
                    log_det: neg_log_det,
                },
                ClassDensity {
                    log_prior: log_priors[1],
                    mean: pos_mean,
                    factor: pos_factor,
                    log_det: pos_log_det,
                },
            ],
        })
    }

    /// Posterior probability of the positive class for a standardized record
    pub fn probability(&self, x: &[f64]) -> f64 {
        sigmoid(self.classes[1].log_score(x) - self.classes[0].log_score(x))
    }

    #[cfg(test)]
    fn class_means(&self) -> [&[f64]; 2] {
        [&self.classes[0].mean, &self.classes[1].mean]
    }
}
