//! Predictor standardization
//!
//! The scaler is fit on training records only. Test records are transformed
//! with the stored training statistics; nothing about them is measured.

use serde::Serialize;

use super::dataset::Dataset;

/// Per-attribute centring and scaling parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    /// Sample standard deviations; zero-variance attributes store 1.0
    pub scales: Vec<f64>,
}

impl StandardScaler {
    /// Compute means and sample standard deviations (n - 1) from `train`.
    pub fn fit(train: &Dataset) -> Self {
        let n = train.len();
        let p = train.n_features();
        let mut means = vec![0.0; p];
        let mut scales = vec![1.0; p];

        if n == 0 {
            return Self { means, scales };
        }

        for row in train.rows() {
            for (m, &x) in means.iter_mut().zip(row.iter()) {
                *m += x;
            }
        }
        for m in &mut means {
            *m /= n as f64;
        }

        if n > 1 {
            let mut sum_sq = vec![0.0; p];
            for row in train.rows() {
                for j in 0..p {
                    let d = row[j] - means[j];
                    sum_sq[j] += d * d;
                }
            }
            for j in 0..p {
                let sd = (sum_sq[j] / (n - 1) as f64).sqrt();
                // Constant columns are centred only
                scales[j] = if sd > 0.0 { sd } else { 1.0 };
            }
        }

        Self { means, scales }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect()
    }

    pub fn transform(&self, data: &Dataset) -> Dataset {
        data.map_rows(|row| self.transform_row(row))
    }
}
