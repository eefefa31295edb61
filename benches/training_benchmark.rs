//! Benchmark model fitting, neighbor-count search and evaluation
//!
//! Run with: cargo bench --bench training_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand::SeedableRng;

use biclass::pipeline::{
    evaluate, find_correlated_pairs, stratified_split, train_model, ClassNames, Dataset,
    KnnSearch, ModelKind, TrainingConfig,
};

/// Generate overlapping score-like data: `n_features` attributes in 1..=10,
/// positives shifted upward, one attribute in four tracking its predecessor
fn generate_dataset(n_rows: usize, n_features: usize, seed: u64) -> Dataset {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n_rows);
    let mut labels = Vec::with_capacity(n_rows);

    for _ in 0..n_rows {
        let positive = rng.gen::<f64>() < 0.35;
        let shift = if positive { 3.0 } else { 0.0 };
        let mut row: Vec<f64> = Vec::with_capacity(n_features);
        for j in 0..n_features {
            let value = if j % 4 == 3 {
                row[j - 1] + rng.gen::<f64>() * 2.0 - 1.0
            } else {
                (1.0 + shift + rng.gen::<f64>() * 6.0).min(10.0)
            };
            row.push(value);
        }
        rows.push(row);
        labels.push(positive);
    }

    Dataset::new(
        (0..n_features).map(|j| format!("attr_{}", j)).collect(),
        rows,
        labels,
        ClassNames::new("malignant", "benign"),
    )
}

fn search(k_max: usize) -> TrainingConfig {
    TrainingConfig {
        knn: KnnSearch {
            k_min: 1,
            k_max,
            folds: 10,
            seed: 42,
        },
    }
}

/// Fit time for each variant as the training partition grows
fn benchmark_fit_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_by_rows");
    group.sample_size(20);

    let row_counts = [200, 700, 2_000];
    let config = search(25);

    for n_rows in row_counts {
        let train = generate_dataset(n_rows, 9, 42);
        group.throughput(Throughput::Elements(n_rows as u64));

        for kind in ModelKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.to_string(), n_rows), &train, |b, train| {
                b.iter(|| {
                    let _ = train_model(black_box(kind), black_box(train), black_box(&config));
                });
            });
        }
    }

    group.finish();
}

/// Cross-validated neighbor search cost against the candidate range
fn benchmark_knn_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_search");
    group.sample_size(10);

    let train = generate_dataset(700, 9, 7);
    for k_max in [5, 15, 25, 50] {
        let config = search(k_max);
        group.bench_with_input(BenchmarkId::from_parameter(k_max), &config, |b, config| {
            b.iter(|| {
                let _ = train_model(
                    black_box(ModelKind::KNearestNeighbors),
                    black_box(&train),
                    black_box(config),
                );
            });
        });
    }

    group.finish();
}

/// Scoring, curve construction and interval on a fitted model
fn benchmark_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.sample_size(30);

    let dataset = generate_dataset(2_000, 9, 3);
    let Ok(split) = stratified_split(&dataset, 0.7, 42) else {
        return;
    };
    let config = search(15);

    for kind in ModelKind::ALL {
        let Ok(model) = train_model(kind, &split.train, &config) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(kind), &model, |b, model| {
            b.iter(|| {
                let _ = evaluate(black_box(model), black_box(&split.test), black_box(0.95));
            });
        });
    }

    group.finish();
}

/// Training-partition correlation scan for the redundancy filter
fn benchmark_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlated_pairs");
    group.sample_size(30);

    for n_features in [9, 30, 60] {
        let train = generate_dataset(2_000, n_features, 11);
        group.throughput(Throughput::Elements(
            ((n_features * (n_features - 1)) / 2) as u64,
        ));
        group.bench_with_input(BenchmarkId::from_parameter(n_features), &train, |b, train| {
            b.iter(|| {
                let _ = find_correlated_pairs(black_box(train), black_box(0.9));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_fit_by_rows,
    benchmark_knn_search,
    benchmark_evaluate,
    benchmark_correlation
);
criterion_main!(benches);
