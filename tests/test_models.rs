//! Integration tests for model training and prediction

use biclass::pipeline::models::{KnnClassifier, LogisticRegression};
use biclass::pipeline::{
    stratified_folds, stratified_split, train_model, ClassNames, Dataset, KnnSearch, ModelError,
    ModelKind, StandardScaler, TrainedModel, TrainingConfig,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn small_search() -> TrainingConfig {
    TrainingConfig {
        knn: KnnSearch {
            k_min: 1,
            k_max: 9,
            folds: 5,
            seed: 42,
        },
    }
}

#[test]
fn test_toy_knn_k1_picks_closest_record() {
    let model = KnnClassifier::fit(&toy_dataset(), 1);
    let prediction = model.predict(&[0.0, 0.0, 0.0]);
    assert!(!prediction.positive, "k = 1 should return Green");
}

#[test]
fn test_toy_knn_k3_picks_majority() {
    let model = KnnClassifier::fit(&toy_dataset(), 3);
    let prediction = model.predict(&[0.0, 0.0, 0.0]);
    assert!(prediction.positive, "k = 3 should return Red");
    assert_eq!(toy_dataset().classes().name(prediction.positive), "Red");
}

#[test]
fn test_every_variant_beats_chance_on_separated_data() {
    let dataset = separated_dataset(60, 11);
    let split = stratified_split(&dataset, 0.7, 42).unwrap();

    for kind in ModelKind::ALL {
        let model = train_model(kind, &split.train, &small_search()).unwrap();
        let predictions = model.predict_all(&split.test);
        let correct = predictions
            .iter()
            .zip(split.test.labels())
            .filter(|(p, &truth)| p.positive == truth)
            .count();
        let accuracy = correct as f64 / split.test.len() as f64;
        assert!(accuracy > 0.9, "{} accuracy {}", kind, accuracy);
        assert!(predictions.iter().all(|p| (0.0..=1.0).contains(&p.probability)));
    }
}

#[test]
fn test_knn_selection_uses_training_only() {
    let original = separated_dataset(40, 5);
    let split = stratified_split(&original, 0.7, 42).unwrap();

    // Same labels and training rows; test records mirrored into the other cloud
    let rows: Vec<Vec<f64>> = (0..original.len())
        .map(|i| {
            let row = original.row(i).to_vec();
            if split.test_indices.binary_search(&i).is_ok() {
                vec![2.5 - row[0], 2.5 - row[1], row[2]]
            } else {
                row
            }
        })
        .collect();
    let shifted = Dataset::new(
        original.feature_names().to_vec(),
        rows,
        original.labels().to_vec(),
        original.classes().clone(),
    );
    let shifted_split = stratified_split(&shifted, 0.7, 42).unwrap();
    assert_eq!(shifted_split.train_indices, split.train_indices);
    assert_eq!(shifted_split.train.rows(), split.train.rows());
    assert_ne!(shifted_split.test.rows(), split.test.rows());

    let model = train_model(ModelKind::KNearestNeighbors, &split.train, &small_search()).unwrap();
    let shifted_model =
        train_model(ModelKind::KNearestNeighbors, &shifted_split.train, &small_search()).unwrap();
    let selection = model.selection.as_ref().unwrap();
    let shifted_selection = shifted_model.selection.as_ref().unwrap();

    assert_eq!(selection.best_k, shifted_selection.best_k);
    assert_eq!(selection.candidates.len(), shifted_selection.candidates.len());
    for (a, b) in selection.candidates.iter().zip(&shifted_selection.candidates) {
        assert_eq!(a.k, b.k);
        assert_eq!(a.mean_accuracy, b.mean_accuracy);
        assert_eq!(a.sd_accuracy, b.sd_accuracy);
    }

    // The test partitions really differ in difficulty
    let accuracy = |m: &TrainedModel, test: &Dataset| {
        m.predict_all(test)
            .iter()
            .zip(test.labels())
            .filter(|(p, &truth)| p.positive == truth)
            .count() as f64
            / test.len() as f64
    };
    assert!(accuracy(&model, &split.test) > 0.8);
    assert!(accuracy(&shifted_model, &shifted_split.test) < 0.3);

    // Cross-validation folds index the training partition only
    let folds = stratified_folds(split.train.labels(), 5, 42).unwrap();
    let mut covered: Vec<usize> = folds.concat();
    covered.sort_unstable();
    assert_eq!(covered, (0..split.train.len()).collect::<Vec<_>>());
}

#[test]
fn test_test_records_do_not_move_the_scaler() {
    let dataset = separated_dataset(30, 2);
    let split = stratified_split(&dataset, 0.7, 42).unwrap();
    let model = train_model(ModelKind::LinearDiscriminant, &split.train, &small_search()).unwrap();

    assert_eq!(model.scaler, StandardScaler::fit(&split.train));
    assert_ne!(model.scaler, StandardScaler::fit(&dataset));

    let before = model.predict(split.test.row(0));
    let _ = model.predict_all(&split.test);
    assert_eq!(model.predict(split.test.row(0)), before);
}

#[test]
fn test_missing_class_is_fitting_error() {
    let train = Dataset::new(
        vec!["x".into()],
        vec![vec![1.0], vec![2.0], vec![3.0]],
        vec![false, false, false],
        ClassNames::new("malignant", "benign"),
    );
    let err = train_model(ModelKind::NaiveBayes, &train, &small_search()).unwrap_err();
    assert!(matches!(err, ModelError::InsufficientClass { ref class, count: 0, .. } if class == "malignant"));
}

#[test]
fn test_logistic_matches_known_fit() {
    // y = 1 iff x > 2.5 except two swapped records; symmetric about 2.5
    let rows: Vec<Vec<f64>> = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 1.5, 3.5]
        .iter()
        .map(|&x| vec![x])
        .collect();
    let labels = vec![false, false, false, true, true, true, true, false];
    let train = Dataset::new(vec!["x".into()], rows, labels, ClassNames::new("p", "n"));

    let model = LogisticRegression::fit(&train).unwrap();
    assert!(model.converged);
    assert!(model.coefficients[0] > 0.0);
    // Symmetric design: the fitted boundary sits at x = 2.5
    let boundary = -model.intercept / model.coefficients[0];
    assert!((boundary - 2.5).abs() < 1e-6, "boundary {}", boundary);
}
