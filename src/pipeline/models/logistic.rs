//! Logistic regression fit by iteratively reweighted least squares

use faer::Mat;
use serde::Serialize;

use super::linalg::{dot, factorize, row_matrix, solve};
use super::{require_class_sizes, rows_by_class, sigmoid};
use crate::pipeline::dataset::Dataset;
use crate::pipeline::error::ModelError;

/// Newton iterations before giving up on convergence
const MAX_ITERATIONS: usize = 25;

/// Relative deviance change that counts as converged
const DEVIANCE_TOLERANCE: f64 = 1e-8;

/// Floor on IRLS weights, keeping fitted probabilities away from exactly 0 or 1
const MIN_WEIGHT: f64 = 1e-10;

/// Fitted probabilities are clamped to this distance from 0 and 1 in the deviance
const PROBABILITY_EPSILON: f64 = 1e-15;

/// Binomial GLM with logit link
#[derive(Debug, Clone, Serialize)]
pub struct LogisticRegression {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// Residual deviance at the final estimate
    pub deviance: f64,
}

impl LogisticRegression {
    /// Maximum-likelihood fit with an intercept.
    ///
    /// Perfectly separable data does not fail: the estimate grows until the
    /// deviance stops changing or the iteration cap is reached, and
    /// `converged` reports which happened.
    ///
    /// # Errors
    /// `InsufficientClass` if either class is absent, `SingularHessian` when
    /// predictors are collinear, `NonFinite` if the estimate diverges.
    pub fn fit(train: &Dataset) -> Result<Self, ModelError> {
        let groups = rows_by_class(train);
        require_class_sizes(train, &groups, 1)?;

        let p = train.n_features() + 1;
        let design: Vec<Vec<f64>> = train.rows().iter().map(|r| with_intercept(r)).collect();
        let design_refs: Vec<&[f64]> = design.iter().map(Vec::as_slice).collect();
        let x = row_matrix(&design_refs, p);
        let mut beta = vec![0.0; p];
        let mut deviance = Self::deviance_at(train, &beta);
        let mut converged = false;
        let mut iterations = 0;

        for iteration in 1..=MAX_ITERATIONS {
            iterations = iteration;

            let mut gradient = vec![0.0; p];
            let mut root_weights = Vec::with_capacity(train.len());
            for (row, &label) in design.iter().zip(train.labels()) {
                let mu = sigmoid(dot(row, &beta));
                let y = if label { 1.0 } else { 0.0 };
                for (g, value) in gradient.iter_mut().zip(row) {
                    *g += (y - mu) * value;
                }
                root_weights.push((mu * (1.0 - mu)).max(MIN_WEIGHT).sqrt());
            }

            // X^T W X as (W^1/2 X)^T (W^1/2 X)
            let weighted = Mat::from_fn(x.nrows(), p, |i, j| root_weights[i] * x[(i, j)]);
            let hessian = weighted.transpose() * &weighted;

            let factor =
                factorize(&hessian).map_err(|_| ModelError::SingularHessian { iteration })?;
            let step = solve(&factor, &gradient);
            for (b, s) in beta.iter_mut().zip(step.iter()) {
                *b += s;
            }

            if beta.iter().any(|b| !b.is_finite()) {
                return Err(ModelError::NonFinite {
                    model: "logistic regression".to_string(),
                });
            }

            let new_deviance = Self::deviance_at(train, &beta);
            let change = (new_deviance - deviance).abs() / (new_deviance.abs() + 0.1);
            deviance = new_deviance;
            if change < DEVIANCE_TOLERANCE {
                converged = true;
                break;
            }
        }

        Ok(Self {
            intercept: beta[0],
            coefficients: beta[1..].to_vec(),
            iterations,
            converged,
            deviance,
        })
    }

    /// Probability of the positive class for a standardized record
    pub fn probability(&self, x: &[f64]) -> f64 {
        sigmoid(self.intercept + dot(&self.coefficients, x))
    }

    fn deviance_at(train: &Dataset, beta: &[f64]) -> f64 {
        -2.0 * train
            .rows()
            .iter()
            .zip(train.labels())
            .map(|(row, &label)| {
                let mu = sigmoid(dot(&with_intercept(row), beta))
                    .clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
                if label {
                    mu.ln()
                } else {
                    (1.0 - mu).ln()
                }
            })
            .sum::<f64>()
    }
}

fn with_intercept(row: &[f64]) -> Vec<f64> {
    let mut x = Vec::with_capacity(row.len() + 1);
    x.push(1.0);
    x.extend_from_slice(row);
    x
}
