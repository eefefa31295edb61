//! Shared test utilities and fixture generators

#![allow(dead_code)]

use biclass::pipeline::{ClassNames, Dataset, WISCONSIN_COLUMNS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Shape of a synthetic breast-cancer-like file
pub struct WisconsinFixture {
    pub benign: usize,
    pub malignant: usize,
    /// Records whose `bare_nuclei` value is written as `?`
    pub missing: usize,
    pub header: bool,
    pub seed: u64,
}

impl Default for WisconsinFixture {
    fn default() -> Self {
        Self {
            benign: 140,
            malignant: 60,
            missing: 5,
            header: true,
            seed: 7,
        }
    }
}

/// Generate record lines (`id, 9 scores in 1..=10, class`) in the UCI layout.
/// Benign records score low, malignant records high; every tenth record
/// draws from the other class's range so the classes are never separable.
pub fn wisconsin_lines(fixture: &WisconsinFixture) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(fixture.seed);
    let total = fixture.benign + fixture.malignant;
    let mut lines = Vec::with_capacity(total);

    for i in 0..total {
        let malignant = i >= fixture.benign;
        let looks_malignant = malignant ^ (i % 10 == 3);
        let (lo, hi) = if looks_malignant { (3, 10) } else { (1, 6) };
        let mut fields = vec![format!("{}", 1_000_000 + i)];
        for attribute in 0..9 {
            let value: i32 = rng.gen_range(lo..=hi);
            if attribute == 5 && i < fixture.missing {
                fields.push("?".to_string());
            } else {
                fields.push(value.to_string());
            }
        }
        fields.push(if malignant { "4" } else { "2" }.to_string());
        lines.push(fields.join(","));
    }
    lines
}

/// Write a synthetic file into a fresh temporary directory
pub fn create_wisconsin_file(fixture: &WisconsinFixture, file_name: &str) -> (TempDir, PathBuf) {
    let mut lines = wisconsin_lines(fixture);
    if fixture.header {
        lines.insert(0, WISCONSIN_COLUMNS.join(","));
    }
    create_temp_text(file_name, &lines)
}

/// Write lines to a file in a fresh temporary directory
pub fn create_temp_text(file_name: &str, lines: &[String]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(file_name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    (temp_dir, path)
}

/// Six observations, three predictors; Red is the positive class
pub fn toy_dataset() -> Dataset {
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

/// Two clouds with `n` records per class that overlap only at the edges
pub fn separated_dataset(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(2 * n);
    let mut labels = Vec::with_capacity(2 * n);
    for i in 0..2 * n {
        let positive = i % 2 == 1;
        let centre = if positive { 2.5 } else { 0.0 };
        rows.push(vec![
            centre + rng.gen_range(-1.5..1.5),
            centre + rng.gen_range(-1.5..1.5),
            rng.gen_range(-1.0..1.0),
        ]);
        labels.push(positive);
    }
    Dataset::new(
        vec!["a".into(), "b".into(), "noise".into()],
        rows,
        labels,
        ClassNames::new("malignant", "benign"),
    )
}
