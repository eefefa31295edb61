//! Stratified, seeded partitioning
//!
//! Both the train/test split and the cross-validation folds shuffle each
//! class separately with a seeded `StdRng`, so class proportions are kept and
//! the same seed always yields the same partition.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::dataset::Dataset;
use super::error::DataError;

/// Default share of records used for training
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.7;

/// Default seed for reproducible partitions
pub const DEFAULT_SEED: u64 = 42;

/// A disjoint training / test partition of one dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    /// Row indices (into the source dataset) of the training records, ascending
    pub train_indices: Vec<usize>,
    /// Row indices of the test records, ascending
    pub test_indices: Vec<usize>,
}

/// Counts describing a split, for reporting
#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub train_fraction: f64,
    pub seed: u64,
    pub train_records: usize,
    pub test_records: usize,
    pub train_positive_rate: f64,
    pub test_positive_rate: f64,
}

impl Split {
    pub fn summary(&self, train_fraction: f64, seed: u64) -> SplitSummary {
        SplitSummary {
            train_fraction,
            seed,
            train_records: self.train.len(),
            test_records: self.test.len(),
            train_positive_rate: self.train.positive_rate(),
            test_positive_rate: self.test.positive_rate(),
        }
    }
}

/// Split a dataset into training and test partitions, stratified by label.
///
/// Each class contributes `round(n_class × train_fraction)` records to
/// training. Records keep their original relative order inside each side.
pub fn stratified_split(
    dataset: &Dataset,
    train_fraction: f64,
    seed: u64,
) -> Result<Split, DataError> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(DataError::InvalidFraction(train_fraction));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::with_capacity(dataset.len());
    let mut test_indices = Vec::with_capacity(dataset.len());

    for class in [true, false] {
        let mut members = class_members(dataset.labels(), class);
        members.shuffle(&mut rng);
        let n_train = (members.len() as f64 * train_fraction).round() as usize;
        train_indices.extend_from_slice(&members[..n_train]);
        test_indices.extend_from_slice(&members[n_train..]);
    }

    if train_indices.is_empty() {
        return Err(DataError::EmptyPartition("Training"));
    }
    if test_indices.is_empty() {
        return Err(DataError::EmptyPartition("Test"));
    }

    train_indices.sort_unstable();
    test_indices.sort_unstable();

    Ok(Split {
        train: dataset.subset(&train_indices),
        test: dataset.subset(&test_indices),
        train_indices,
        test_indices,
    })
}

/// Assign record indices to `k` stratified folds.
///
/// Each class is shuffled and dealt round-robin, continuing the deal across
/// classes so fold sizes differ by at most one.
pub fn stratified_folds(labels: &[bool], k: usize, seed: u64) -> Result<Vec<Vec<usize>>, DataError> {
    if k < 2 || k > labels.len() {
        return Err(DataError::EmptyPartition("Cross-validation fold"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut folds: Vec<Vec<usize>> = vec![Vec::new(); k];
    let mut next = 0usize;

    for class in [true, false] {
        let mut members = class_members(labels, class);
        members.shuffle(&mut rng);
        for idx in members {
            folds[next % k].push(idx);
            next += 1;
        }
    }

    for fold in &mut folds {
        fold.sort_unstable();
    }

    Ok(folds)
}

fn class_members(labels: &[bool], class: bool) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, &l)| l == class)
        .map(|(i, _)| i)
        .collect()
}
