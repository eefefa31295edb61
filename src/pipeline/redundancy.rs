//! Correlation-based removal of redundant predictors
//!
//! Pairs are found on the training partition only; the resulting column
//! list is then removed from both partitions.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::Serialize;

use super::dataset::Dataset;

/// Represents a correlated pair of predictors
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedPair {
    pub feature1: String,
    pub feature2: String,
    pub correlation: f64,
}

/// Pearson correlation for every predictor pair whose |r| exceeds `threshold`,
/// sorted by absolute correlation descending
pub fn find_correlated_pairs(train: &Dataset, threshold: f64) -> Vec<CorrelatedPair> {
    let p = train.n_features();
    if p < 2 {
        return Vec::new();
    }

    let columns: Vec<Vec<f64>> = (0..p).map(|j| train.column(j)).collect();
    let names = train.feature_names();

    let pairs: Vec<(usize, usize)> = (0..p)
        .flat_map(|i| ((i + 1)..p).map(move |j| (i, j)))
        .collect();

    let mut correlated: Vec<CorrelatedPair> = pairs
        .par_iter()
        .filter_map(|&(i, j)| {
            let r = pearson_correlation(&columns[i], &columns[j])?;
            (r.abs() > threshold).then(|| CorrelatedPair {
                feature1: names[i].clone(),
                feature2: names[j].clone(),
                correlation: r,
            })
        })
        .collect();

    correlated.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
    correlated
}

/// Single-pass Welford estimate; `None` for constant or too-short columns
fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() < 2 || x.len() != y.len() {
        return None;
    }

    let (mut mean_x, mut mean_y) = (0.0, 0.0);
    let (mut var_x, mut var_y, mut cov_xy) = (0.0, 0.0, 0.0);
    for (n, (&a, &b)) in x.iter().zip(y).enumerate() {
        let count = (n + 1) as f64;
        let dx = a - mean_x;
        let dy = b - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        var_x += dx * (a - mean_x);
        var_y += dy * (b - mean_y);
        cov_xy += dx * (b - mean_y);
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    let r = cov_xy / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then_some(r)
}

/// Pick one predictor per pair to remove.
///
/// Pairs are visited strongest first; a pair already broken by an earlier
/// removal is skipped. Otherwise the predictor involved in more pairs goes,
/// the first one on a tie.
pub fn select_features_to_drop(pairs: &[CorrelatedPair]) -> Vec<String> {
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for pair in pairs {
        *frequency.entry(pair.feature1.as_str()).or_insert(0) += 1;
        *frequency.entry(pair.feature2.as_str()).or_insert(0) += 1;
    }

    let mut to_drop = Vec::new();
    let mut resolved: HashSet<&str> = HashSet::new();

    for pair in pairs {
        if resolved.contains(pair.feature1.as_str()) || resolved.contains(pair.feature2.as_str()) {
            continue;
        }
        let freq1 = frequency.get(pair.feature1.as_str()).copied().unwrap_or(0);
        let freq2 = frequency.get(pair.feature2.as_str()).copied().unwrap_or(0);
        let victim = if freq1 >= freq2 {
            &pair.feature1
        } else {
            &pair.feature2
        };
        resolved.insert(victim.as_str());
        to_drop.push(victim.clone());
    }

    to_drop
}
