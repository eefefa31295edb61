//! k-nearest neighbors with cross-validated neighbor count
//!
//! Neighbors are ranked by Euclidean distance with a stable sort, so equal
//! distances keep training order. A vote tie goes to the class of the
//! closest neighbor.

use rayon::prelude::*;
use serde::Serialize;

use super::Prediction;
use crate::pipeline::dataset::Dataset;
use crate::pipeline::error::ModelError;
use crate::pipeline::scaler::StandardScaler;
use crate::pipeline::split::stratified_folds;

/// Neighbor-count search settings
#[derive(Debug, Clone, Serialize)]
pub struct KnnSearch {
    pub k_min: usize,
    pub k_max: usize,
    /// Number of cross-validation folds over the training partition
    pub folds: usize,
    pub seed: u64,
}

impl Default for KnnSearch {
    fn default() -> Self {
        Self {
            k_min: 1,
            k_max: 25,
            folds: 10,
            seed: 42,
        }
    }
}

/// Mean validation accuracy of one candidate
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    pub k: usize,
    pub mean_accuracy: f64,
    pub sd_accuracy: f64,
}

/// Outcome of the neighbor-count search
#[derive(Debug, Clone, Serialize)]
pub struct KnnSelection {
    pub best_k: usize,
    pub candidates: Vec<CandidateScore>,
}

/// Stored training records for neighbor lookups
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    pub k: usize,
    rows: Vec<Vec<f64>>,
    labels: Vec<bool>,
}

impl KnnClassifier {
    /// Store `train` as-is; callers standardize beforehand when needed.
    pub fn fit(train: &Dataset, k: usize) -> Self {
        Self {
            k: k.max(1),
            rows: train.rows().to_vec(),
            labels: train.labels().to_vec(),
        }
    }

    /// Training indices ordered by distance to `x`, closest first
    pub fn neighbors(&self, x: &[f64]) -> Vec<usize> {
        nearest_order(&self.rows, x)
    }

    /// Probability = positive share among the k nearest; class by majority vote
    pub fn predict(&self, x: &[f64]) -> Prediction {
        let order = self.neighbors(x);
        let labels: Vec<bool> = order.iter().map(|&i| self.labels[i]).collect();
        vote(&labels, self.k)
    }
}

/// Indices of `rows` sorted by squared Euclidean distance to `x` (stable)
fn nearest_order(rows: &[Vec<f64>], x: &[f64]) -> Vec<usize> {
    let distances: Vec<f64> = rows
        .iter()
        .map(|r| r.iter().zip(x).map(|(a, b)| (a - b) * (a - b)).sum())
        .collect();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));
    order
}

/// Majority vote over the first `k` labels of a closest-first list
fn vote(sorted_labels: &[bool], k: usize) -> Prediction {
    let k = k.min(sorted_labels.len());
    if k == 0 {
        return Prediction::from_probability(0.5);
    }
    let nearest = &sorted_labels[..k];
    let positives = nearest.iter().filter(|&&l| l).count();
    let probability = positives as f64 / k as f64;
    let positive = match (2 * positives).cmp(&k) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => nearest[0],
    };
    Prediction {
        probability,
        positive,
    }
}

/// Choose the neighbor count by stratified k-fold cross-validation on `train`.
///
/// Each fold re-fits the scaler on its own training part. Candidates larger
/// than the smallest fold-training size are dropped; ties in mean accuracy
/// go to the smaller k.
pub fn select_neighbor_count(train: &Dataset, search: &KnnSearch) -> Result<KnnSelection, ModelError> {
    if search.folds < 2 || search.folds > train.len() {
        return Err(ModelError::InvalidFolds(search.folds));
    }
    let folds = stratified_folds(train.labels(), search.folds, search.seed)
        .map_err(|_| ModelError::InvalidFolds(search.folds))?;

    let smallest_fold_train = folds.iter().map(|f| train.len() - f.len()).min().unwrap_or(0);
    let k_max = search.k_max.min(smallest_fold_train);
    if search.k_min == 0 || search.k_min > k_max {
        return Err(ModelError::InvalidNeighborRange {
            k_min: search.k_min,
            k_max: search.k_max,
            available: smallest_fold_train,
        });
    }

    // accuracy[fold][k - k_min]
    let per_fold: Vec<Vec<f64>> = folds
        .par_iter()
        .map(|validation| {
            let fit_indices: Vec<usize> = (0..train.len())
                .filter(|i| validation.binary_search(i).is_err())
                .collect();
            let fold_train = train.subset(&fit_indices);
            let fold_valid = train.subset(validation);

            let scaler = StandardScaler::fit(&fold_train);
            let fold_train = scaler.transform(&fold_train);
            let fold_valid = scaler.transform(&fold_valid);

            // Sorted neighbor labels per validation record, reused for every k
            let neighbor_labels: Vec<Vec<bool>> = fold_valid
                .rows()
                .iter()
                .map(|row| {
                    nearest_order(fold_train.rows(), row)
                        .into_iter()
                        .take(k_max)
                        .map(|i| fold_train.label(i))
                        .collect()
                })
                .collect();

            (search.k_min..=k_max)
                .map(|k| {
                    let correct = neighbor_labels
                        .iter()
                        .zip(fold_valid.labels())
                        .filter(|(labels, &truth)| vote(labels, k).positive == truth)
                        .count();
                    correct as f64 / fold_valid.len() as f64
                })
                .collect()
        })
        .collect();

    let n_folds = per_fold.len() as f64;
    let candidates: Vec<CandidateScore> = (search.k_min..=k_max)
        .enumerate()
        .map(|(idx, k)| {
            let scores: Vec<f64> = per_fold.iter().map(|f| f[idx]).collect();
            let mean = scores.iter().sum::<f64>() / n_folds;
            let var = if scores.len() > 1 {
                scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n_folds - 1.0)
            } else {
                0.0
            };
            CandidateScore {
                k,
                mean_accuracy: mean,
                sd_accuracy: var.sqrt(),
            }
        })
        .collect();

    let mut best = &candidates[0];
    for candidate in &candidates[1..] {
        if candidate.mean_accuracy > best.mean_accuracy {
            best = candidate;
        }
    }

    Ok(KnnSelection {
        best_k: best.k,
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::dataset::ClassNames;

    fn toy() -> Dataset {
        // Six observations, three predictors; positive = Red
        Dataset::new(
            vec!["x1".into(), "x2".into(), "x3".into()],
            vec![
                vec![0.0, 3.0, 0.0],
                vec![2.0, 0.0, 0.0],
                vec![0.0, 1.0, 3.0],
                vec![0.0, 1.0, 2.0],
                vec![-1.0, 0.0, 1.0],
                vec![1.0, -1.0, 1.0],
            ],
            vec![true, true, true, false, false, true],
            ClassNames::new("Red", "Green"),
        )
    }

    #[test]
    fn test_neighbor_order_at_origin() {
        let model = KnnClassifier::fit(&toy(), 1);
        assert_eq!(model.neighbors(&[0.0, 0.0, 0.0]), vec![4, 5, 1, 3, 0, 2]);
    }

    #[test]
    fn test_k1_returns_closest_class() {
        let model = KnnClassifier::fit(&toy(), 1);
        let pred = model.predict(&[0.0, 0.0, 0.0]);
        assert!(!pred.positive); // Green
        assert_eq!(pred.probability, 0.0);
    }

    #[test]
    fn test_k3_returns_majority() {
        let model = KnnClassifier::fit(&toy(), 3);
        let pred = model.predict(&[0.0, 0.0, 0.0]);
        assert!(pred.positive); // Red
        assert!((pred.probability - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_k_tie_goes_to_closest() {
        // k = 2 at origin: Green (obs 5) then Red (obs 6) -> Green
        let model = KnnClassifier::fit(&toy(), 2);
        let pred = model.predict(&[0.0, 0.0, 0.0]);
        assert_eq!(pred.probability, 0.5);
        assert!(!pred.positive);
    }

    #[test]
    fn test_equal_distances_keep_training_order() {
        let ds = Dataset::new(
            vec!["x".into()],
            vec![vec![1.0], vec![-1.0]],
            vec![true, false],
            ClassNames::new("p", "n"),
        );
        let model = KnnClassifier::fit(&ds, 2);
        assert_eq!(model.neighbors(&[0.0]), vec![0, 1]);
        assert!(model.predict(&[0.0]).positive);
    }

    fn clustered(n: usize) -> Dataset {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n {
            let jitter = ((i * 7) % 11) as f64 / 11.0;
            rows.push(vec![jitter, 1.0 - jitter]);
            labels.push(false);
            rows.push(vec![4.0 + jitter, 5.0 - jitter]);
            labels.push(true);
        }
        Dataset::new(vec!["a".into(), "b".into()], rows, labels, ClassNames::new("p", "n"))
    }

    #[test]
    fn test_selection_scores_every_candidate() {
        let search = KnnSearch {
            k_min: 1,
            k_max: 9,
            folds: 5,
            seed: 11,
        };
        let selection = select_neighbor_count(&clustered(30), &search).unwrap();
        assert_eq!(selection.candidates.len(), 9);
        // Perfectly separated clusters: every k is perfect, smallest wins the tie
        assert_eq!(selection.best_k, 1);
        assert!(selection.candidates.iter().all(|c| (c.mean_accuracy - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let search = KnnSearch {
            k_min: 1,
            k_max: 15,
            folds: 5,
            seed: 5,
        };
        let data = clustered(20);
        let a = select_neighbor_count(&data, &search).unwrap();
        let b = select_neighbor_count(&data, &search).unwrap();
        assert_eq!(a.best_k, b.best_k);
    }

    #[test]
    fn test_k_range_capped_by_fold_size() {
        let search = KnnSearch {
            k_min: 1,
            k_max: 1000,
            folds: 4,
            seed: 1,
        };
        let selection = select_neighbor_count(&clustered(10), &search).unwrap();
        // 20 records, folds of 5 -> 15 records to fit on
        assert_eq!(selection.candidates.last().unwrap().k, 15);
    }

    #[test]
    fn test_invalid_ranges() {
        let data = clustered(5);
        let zero_k = KnnSearch {
            k_min: 0,
            ..Default::default()
        };
        assert!(matches!(
            select_neighbor_count(&data, &KnnSearch { folds: 5, ..zero_k }),
            Err(ModelError::InvalidNeighborRange { .. })
        ));
        let one_fold = KnnSearch {
            folds: 1,
            ..Default::default()
        };
        assert!(matches!(
            select_neighbor_count(&data, &one_fold),
            Err(ModelError::InvalidFolds(1))
        ));
    }
}
