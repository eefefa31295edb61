//! Biclass: Binary Classifier Comparison CLI
//!
//! Loads a labeled table, holds out a stratified test partition, fits several
//! standard classifiers on the rest and ranks them on the held-out records.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use biclass::cli::{confirm_drop_records, Cli};
use biclass::pipeline::{
    clean_dataset, evaluate, find_correlated_pairs, get_column_names, load_dataset_with_progress,
    rank_models, select_features_to_drop, stratified_split, train_model, DataError, FittedModel,
};
use biclass::report::{
    export_comparison_report, export_curves, ComparisonReportBuilder, ComparisonSummary,
    StepTimings,
};
use biclass::utils::{
    create_progress_bar, create_spinner, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config().map_err(|e| anyhow::anyhow!(e))?;
    let input = &cli.input;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, &config);

    let mut timings = StepTimings::default();
    let mut report = ComparisonReportBuilder::new(input.display().to_string(), config.snapshot());

    // Step 1: Load
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let columns = get_column_names(input, &config.load)?;
    if !columns.contains(&config.cleaning.target) {
        return Err(DataError::MissingColumn {
            name: config.cleaning.target.clone(),
            available: columns,
        }
        .into());
    }
    let (df, rows, cols) = load_dataset_with_progress(input, &config.load)?;
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    timings.load = step_start.elapsed();
    print_step_time(timings.load);

    // Step 2: Clean
    print_step_header(2, "Clean Records");
    let step_start = Instant::now();
    let spinner = create_spinner("Validating labels and attributes...");
    let (dataset, cleaning) = clean_dataset(&df, &config.cleaning)?;
    finish_with_success(&spinner, "Labels validated");
    drop(df);

    if !cleaning.removed_columns.is_empty() {
        print_info(&format!(
            "Removed identifier column(s): {}",
            cleaning.removed_columns.join(", ")
        ));
    }
    if cleaning.records_dropped == 0 {
        print_info("No records with missing attribute values");
    } else {
        print_count(
            "record(s) with missing attribute values",
            cleaning.records_dropped,
            Some(&format!("(of {})", cleaning.records_read)),
        );
        for (column, count) in cleaning.missing_by_column.iter().filter(|(_, c)| *c > 0) {
            println!("        {} {}: {}", style("•").dim(), column, count);
        }
        if !cli.no_confirm && !confirm_drop_records(cleaning.records_dropped, cleaning.records_read)? {
            println!("Cancelled by user.");
            return Ok(());
        }
        print_success("Dropped incomplete records");
    }
    println!(
        "      {} {} / {} {}",
        style(cleaning.positive_count).yellow().bold(),
        dataset.classes().positive,
        style(cleaning.negative_count).yellow().bold(),
        dataset.classes().negative
    );
    report.set_cleaning(&cleaning);
    timings.clean = step_start.elapsed();
    print_step_time(timings.clean);

    // Step 3: Split
    print_step_header(3, "Stratified Split");
    let step_start = Instant::now();
    let split = stratified_split(&dataset, config.train_fraction, config.seed)?;
    let split_summary = split.summary(config.train_fraction, config.seed);
    print_success(&format!(
        "{} training / {} test records (seed {})",
        split_summary.train_records, split_summary.test_records, config.seed
    ));
    print_info(&format!(
        "Positive share: train {:.1}%, test {:.1}%",
        split_summary.train_positive_rate * 100.0,
        split_summary.test_positive_rate * 100.0
    ));
    report.set_split(split_summary);
    let (mut train, mut test) = (split.train, split.test);

    if let Some(threshold) = config.correlation_threshold {
        let pairs = find_correlated_pairs(&train, threshold);
        let to_drop = select_features_to_drop(&pairs);
        if pairs.is_empty() {
            print_info("No highly correlated predictor pairs found");
        } else {
            print_count(
                "correlated pair(s)",
                pairs.len(),
                Some(&format!("(|r| > {:.2})", threshold)),
            );
            train = train.without_features(&to_drop);
            test = test.without_features(&to_drop);
            print_success(&format!("Dropped {}", to_drop.join(", ")));
        }
        report.set_redundancy(threshold, &pairs, &to_drop);
    }
    timings.split = step_start.elapsed();
    print_step_time(timings.split);

    // Step 4: Train
    print_step_header(4, "Train Models");
    let step_start = Instant::now();
    let progress = create_progress_bar(config.models.len() as u64, "Fitting");
    let mut trained = Vec::with_capacity(config.models.len());
    for &kind in &config.models {
        progress.set_message(format!("Fitting {}", kind.label()));
        let model = match train_model(kind, &train, &config.training) {
            Ok(model) => model,
            Err(e) => {
                finish_with_warning(&progress, &format!("{} failed", kind.label()));
                return Err(e).with_context(|| format!("Failed to fit {}", kind.label()));
            }
        };
        progress.inc(1);
        trained.push(model);
    }
    finish_with_success(&progress, &format!("Fitted {} model(s)", trained.len()));

    for model in &trained {
        match &model.model {
            FittedModel::Logistic(m) if !m.converged => print_warning(&format!(
                "{} did not converge after {} iterations",
                model.kind.label(),
                m.iterations
            )),
            _ => print_info(&format!("{}: {}", model.kind.label(), model.details())),
        }
    }
    timings.train = step_start.elapsed();
    print_step_time(timings.train);

    // Step 5: Evaluate
    print_step_header(5, "Evaluate on Test Partition");
    let step_start = Instant::now();
    let spinner = create_spinner("Scoring test records...");
    let mut evaluations = Vec::with_capacity(trained.len());
    for model in &trained {
        let evaluation = evaluate(model, &test, config.confidence)
            .with_context(|| format!("Failed to evaluate {}", model.kind.label()))?;
        report.add_model(&evaluation, model.selection.as_ref());
        evaluations.push(evaluation);
    }
    finish_with_success(&spinner, "Evaluation complete");
    timings.evaluate = step_start.elapsed();
    print_step_time(timings.evaluate);

    let ranking = rank_models(
        &evaluations,
        config.rank_by,
        dataset.minority_rate(),
        config.imbalance_threshold,
    );
    report.set_ranking(&ranking);
    report.set_timing(&timings);

    ComparisonSummary {
        evaluations: &evaluations,
        ranking: &ranking,
        classes: dataset.classes(),
        timings: &timings,
    }
    .display();

    // Exports
    if let Some(path) = cli.report_path() {
        export_comparison_report(&report.build(), &path)?;
        print_success(&format!("Report saved to {}", path.display()));
    }
    if let Some(path) = cli.curves_path() {
        export_curves(&evaluations, path)?;
        print_success(&format!("Curve points saved to {}", path.display()));
    }

    print_completion();

    Ok(())
}
