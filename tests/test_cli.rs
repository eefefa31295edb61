//! Tests for CLI argument parsing and the binary end to end

use assert_cmd::Command;
use biclass::cli::Cli;
use biclass::pipeline::{ModelKind, RankMetric};
use clap::Parser;
use predicates::prelude::*;
use std::path::PathBuf;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["biclass", "-i", "breast-cancer-wisconsin.data"]);

    assert_eq!(cli.target, "class", "Default target should be 'class'");
    assert_eq!(cli.missing_token, "?");
    assert_eq!(cli.drop_columns, vec!["id".to_string()]);
    assert_eq!(cli.positive_code, "4");
    assert_eq!(cli.negative_code, "2");
    assert_eq!(cli.train_fraction, 0.7, "Default train fraction should be 0.7");
    assert_eq!(cli.seed, 42);
    assert_eq!(cli.models, ModelKind::ALL.to_vec());
    assert_eq!((cli.k_min, cli.k_max, cli.folds), (1, 25, 10));
    assert_eq!(cli.rank_by, RankMetric::Auto);
    assert_eq!(cli.imbalance_threshold, 0.2);
    assert_eq!(cli.confidence, 0.95);
    assert!(cli.correlation_threshold.is_none());
    assert!(!cli.no_confirm, "Default no_confirm should be false");
    assert!(cli.report_path().is_none());
}

#[test]
fn test_cli_model_list_and_metric() {
    let cli = Cli::parse_from([
        "biclass", "-i", "data.csv", "--models", "knn,nb", "--rank-by", "pr",
    ]);
    assert_eq!(
        cli.models,
        vec![ModelKind::KNearestNeighbors, ModelKind::NaiveBayes]
    );
    assert_eq!(cli.rank_by, RankMetric::PrAuc);
}

#[test]
fn test_cli_rejects_out_of_range_values() {
    assert!(Cli::try_parse_from(["biclass", "-i", "d.csv", "--train-fraction", "1.0"]).is_err());
    assert!(Cli::try_parse_from(["biclass", "-i", "d.csv", "--folds", "1"]).is_err());
    assert!(Cli::try_parse_from(["biclass", "-i", "d.csv", "--models", "svm"]).is_err());
    assert!(Cli::try_parse_from(["biclass", "-i", "d.csv", "--confidence", "0"]).is_err());
    assert!(Cli::try_parse_from(["biclass", "-i", "d.csv", "--correlation-threshold", "1.5"]).is_err());
}

#[test]
fn test_cli_report_path_derivation() {
    let cli = Cli::parse_from(["biclass", "-i", "/data/wisconsin.csv", "--export"]);
    assert_eq!(
        cli.report_path(),
        Some(PathBuf::from("/data/wisconsin_comparison.json"))
    );

    let cli = Cli::parse_from(["biclass", "-i", "/data/wisconsin.csv", "--report", "/tmp/out.json"]);
    assert_eq!(cli.report_path(), Some(PathBuf::from("/tmp/out.json")));
}

#[test]
fn test_cli_no_header_applies_wisconsin_names() {
    let cli = Cli::parse_from(["biclass", "-i", "wdbc.data", "--no-header"]);
    let names = cli.column_names().unwrap();
    assert_eq!(names.len(), 11);
    assert_eq!(names[0], "id");
    assert_eq!(names[10], "class");

    let cli = Cli::parse_from(["biclass", "-i", "wdbc.data", "--no-header", "--columns", "a,b,label"]);
    assert_eq!(cli.column_names().unwrap(), vec!["a", "b", "label"]);
}

#[test]
fn test_to_config_checks_cross_field_constraints() {
    let cli = Cli::parse_from(["biclass", "-i", "d.csv", "--k-min", "9", "--k-max", "3"]);
    assert!(cli.to_config().unwrap_err().contains("--k-min"));

    let cli = Cli::parse_from(["biclass", "-i", "d.csv", "--positive-code", "2"]);
    assert!(cli.to_config().unwrap_err().contains("must differ"));

    let cli = Cli::parse_from(["biclass", "-i", "d.csv", "--drop-columns", "id,class"]);
    assert!(cli.to_config().unwrap_err().contains("cannot be dropped"));
}

#[test]
fn test_to_config_deduplicates_models() {
    let cli = Cli::parse_from(["biclass", "-i", "d.csv", "--models", "lda,knn,lda"]);
    let config = cli.to_config().unwrap();
    assert_eq!(
        config.models,
        vec![ModelKind::LinearDiscriminant, ModelKind::KNearestNeighbors]
    );
    assert_eq!(config.training.knn.seed, 42);
    assert!(config.load.has_header);
}

#[test]
fn test_binary_runs_comparison_and_writes_outputs() {
    let (dir, path) = create_wisconsin_file(&WisconsinFixture::default(), "wisconsin.csv");
    let report = dir.path().join("report.json");
    let curves = dir.path().join("curves.csv");

    Command::cargo_bin("biclass")
        .unwrap()
        .arg("-i")
        .arg(&path)
        .args(["--k-max", "7", "--folds", "5", "--no-confirm"])
        .arg("--report")
        .arg(&report)
        .arg("--curves")
        .arg(&curves)
        .assert()
        .success()
        .stdout(predicate::str::contains("MODEL RANKING"))
        .stdout(predicate::str::contains("Naive Bayes"))
        .stdout(predicate::str::contains("Dropped incomplete records"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["models"].as_array().unwrap().len(), 5);
    assert_eq!(json["settings"]["seed"], 42);
    assert!(curves.exists());
}

#[test]
fn test_binary_reports_bad_label() {
    let lines = vec![
        "id,thickness,class".to_string(),
        "1,5,2".to_string(),
        "2,3,4".to_string(),
        "3,7,9".to_string(),
    ];
    let (_dir, path) = create_temp_text("bad.csv", &lines);

    Command::cargo_bin("biclass")
        .unwrap()
        .arg("-i")
        .arg(&path)
        .arg("--no-confirm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unexpected label value '9'"));
}

#[test]
fn test_binary_rejects_unknown_column() {
    let (_dir, path) = create_wisconsin_file(&WisconsinFixture::default(), "wisconsin.csv");

    Command::cargo_bin("biclass")
        .unwrap()
        .arg("-i")
        .arg(&path)
        .args(["--target", "diagnosis", "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column 'diagnosis' not found"));
}
