//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::pipeline::ComparisonConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static DICE: Emoji<'_, '_> = Emoji("🎲 ", "");
pub static SCALE: Emoji<'_, '_> = Emoji("⚖️  ", "");

const BOX_WIDTH: usize = 60;

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ██████╗ ██╗ ██████╗██╗      █████╗ ███████╗███████╗
    ██╔══██╗██║██╔════╝██║     ██╔══██╗██╔════╝██╔════╝
    ██████╔╝██║██║     ██║     ███████║███████╗███████╗
    ██╔══██╗██║██║     ██║     ██╔══██║╚════██║╚════██║
    ██████╔╝██║╚██████╗███████╗██║  ██║███████║███████║
    ╚═════╝ ╚═╝ ╚═════╝╚══════╝╚═╝  ╚═╝╚══════╝╚══════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Binary classifiers, compared on held-out data").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, config: &ComparisonConfig) {
    let line = "─".repeat(BOX_WIDTH - 2);
    let encoding = &config.cleaning.encoding;

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("Configuration").cyan().bold(),
        " ".repeat(BOX_WIDTH - 16)
    );
    println!("    ├{}┤", line);
    card_row(FOLDER, "Input", &truncate_path(input, 36));
    card_row(TARGET, "Target", &truncate_string(&config.cleaning.target, 36));
    card_row(
        TARGET,
        "Classes",
        &format!(
            "{}={} / {}={}",
            encoding.positive_code, encoding.positive_name, encoding.negative_code, encoding.negative_name
        ),
    );
    println!("    ├{}┤", line);
    card_row(
        DICE,
        "Split",
        &format!("{:.0}% train, seed {}", config.train_fraction * 100.0, config.seed),
    );
    card_row(
        CHART,
        "Models",
        &config
            .models
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    card_row(
        CHART,
        "KNN search",
        &format!(
            "k {}..={}, {} folds",
            config.training.knn.k_min, config.training.knn.k_max, config.training.knn.folds
        ),
    );
    card_row(SCALE, "Rank by", &config.rank_by.to_string());
    if let Some(threshold) = config.correlation_threshold {
        card_row(SCALE, "Correlation", &format!("drop |r| > {:.2}", threshold));
    }
    println!("    └{}┘", line);
    println!();
}

fn card_row(icon: Emoji<'_, '_>, label: &str, value: &str) {
    let label = format!("{}:", label);
    println!(
        "    │  {}{:<12} {:<38}│",
        icon,
        label,
        style(truncate_string(value, 38)).yellow()
    );
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Biclass comparison complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
