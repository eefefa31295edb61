//! Console summary of a comparison run

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{ClassNames, Evaluation, Ranking};

/// Wall-clock time spent in each step
#[derive(Debug, Default, Clone)]
pub struct StepTimings {
    pub load: Duration,
    pub clean: Duration,
    pub split: Duration,
    pub train: Duration,
    pub evaluate: Duration,
}

impl StepTimings {
    pub fn total(&self) -> Duration {
        self.load + self.clean + self.split + self.train + self.evaluate
    }
}

/// Everything shown in the final summary
#[derive(Debug)]
pub struct ComparisonSummary<'a> {
    pub evaluations: &'a [Evaluation],
    pub ranking: &'a Ranking,
    pub classes: &'a ClassNames,
    pub timings: &'a StepTimings,
}

impl ComparisonSummary<'_> {
    pub fn display(&self) {
        section("📋", "MODEL RANKING");
        print_indented(&ranking_table(self.ranking, self.evaluations));
        println!(
            "    {}",
            style(format!(
                "Ranked by {} (minority share {:.1}%)",
                self.ranking.metric,
                self.ranking.minority_rate * 100.0
            ))
            .dim()
        );

        section("🧪", "TEST-SET METRICS");
        print_indented(&metrics_table(self.evaluations));

        section("🔢", "CONFUSION MATRICES");
        for evaluation in self.evaluations {
            println!();
            println!(
                "      {} {}",
                style(evaluation.model.label()).yellow(),
                style(format!("({})", evaluation.details)).dim()
            );
            print_indented(&confusion_table(evaluation, self.classes));
        }

        section("⏱", "TIMING");
        print_indented(&timing_table(self.timings));
    }
}

fn section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn numeric(value: impl ToString) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

/// Ranking table: rank, model, ranking score, accuracy with interval
pub fn ranking_table(ranking: &Ranking, evaluations: &[Evaluation]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Model").add_attribute(Attribute::Bold),
        Cell::new(ranking.metric.to_string()).add_attribute(Attribute::Bold),
        Cell::new("Accuracy").add_attribute(Attribute::Bold),
        Cell::new("CI").add_attribute(Attribute::Bold),
    ]);

    for entry in &ranking.entries {
        let interval = evaluations
            .iter()
            .find(|e| e.model == entry.model)
            .map(|e| {
                format!(
                    "{:.0}%: {:.4} – {:.4}",
                    e.accuracy.level * 100.0,
                    e.accuracy.lower,
                    e.accuracy.upper
                )
            })
            .unwrap_or_default();

        let mut model_cell = Cell::new(entry.model.label());
        let mut score_cell = numeric(format!("{:.4}", entry.score));
        if entry.rank == 1 {
            model_cell = model_cell.fg(Color::Green).add_attribute(Attribute::Bold);
            score_cell = score_cell.fg(Color::Green).add_attribute(Attribute::Bold);
        }

        table.add_row(vec![
            numeric(entry.rank),
            model_cell,
            score_cell,
            numeric(format!("{:.4}", entry.accuracy)),
            Cell::new(interval),
        ]);
    }
    table
}

/// Derived rates for every model, in evaluation order
pub fn metrics_table(evaluations: &[Evaluation]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        [
            "Model", "ROC AUC", "PR AUC", "Sens.", "Spec.", "PPV", "NPV", "F1", "Kappa",
        ]
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for e in evaluations {
        table.add_row(vec![
            Cell::new(e.model.label()),
            numeric(format!("{:.4}", e.roc_auc())),
            numeric(format!("{:.4}", e.pr_auc())),
            numeric(format!("{:.4}", e.sensitivity)),
            numeric(format!("{:.4}", e.specificity)),
            numeric(format!("{:.4}", e.precision)),
            numeric(format!("{:.4}", e.negative_predictive_value)),
            numeric(format!("{:.4}", e.f1)),
            numeric(format!("{:.4}", e.kappa)),
        ]);
    }
    table
}

/// 2×2 confusion matrix laid out as predicted (rows) by actual (columns)
pub fn confusion_table(evaluation: &Evaluation, classes: &ClassNames) -> Table {
    let cm = &evaluation.confusion;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Predicted \\ Actual").add_attribute(Attribute::Bold),
        Cell::new(&classes.negative).add_attribute(Attribute::Bold),
        Cell::new(&classes.positive).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(&classes.negative),
        numeric(cm.true_negatives).fg(Color::Green),
        numeric(cm.false_negatives).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new(&classes.positive),
        numeric(cm.false_positives).fg(Color::Red),
        numeric(cm.true_positives).fg(Color::Green),
    ]);
    table
}

fn timing_table(timings: &StepTimings) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Step").add_attribute(Attribute::Bold),
        Cell::new("Seconds").add_attribute(Attribute::Bold),
    ]);
    for (name, elapsed) in [
        ("Load", timings.load),
        ("Clean", timings.clean),
        ("Split", timings.split),
        ("Train", timings.train),
        ("Evaluate", timings.evaluate),
    ] {
        table.add_row(vec![Cell::new(name), numeric(format!("{:.3}", elapsed.as_secs_f64()))]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        numeric(format!("{:.3}", timings.total().as_secs_f64())).add_attribute(Attribute::Bold),
    ]);
    table
}
