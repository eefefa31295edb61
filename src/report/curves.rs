//! Curve points as CSV for plotting ROC / precision-recall overlays

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::{Curve, Evaluation};

/// One row per curve point: `model, curve, threshold, x, y`
pub fn curves_frame(evaluations: &[Evaluation]) -> PolarsResult<DataFrame> {
    let mut model = Vec::new();
    let mut curve = Vec::new();
    let mut threshold = Vec::new();
    let mut x = Vec::new();
    let mut y = Vec::new();

    let mut push = |name: String, kind: &str, c: &Curve| {
        for point in &c.points {
            model.push(name.clone());
            curve.push(kind.to_string());
            threshold.push(point.threshold);
            x.push(point.x);
            y.push(point.y);
        }
    };

    for evaluation in evaluations {
        push(evaluation.model.to_string(), "roc", &evaluation.roc);
        push(evaluation.model.to_string(), "pr", &evaluation.pr);
    }

    DataFrame::new(vec![
        Column::new("model".into(), model),
        Column::new("curve".into(), curve),
        Column::new("threshold".into(), threshold),
        Column::new("x".into(), x),
        Column::new("y".into(), y),
    ])
}

/// Write all curve points to a CSV file
pub fn export_curves(evaluations: &[Evaluation], output_path: &Path) -> Result<()> {
    let mut df = curves_frame(evaluations).context("Failed to assemble curve points")?;
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create curve file: {}", output_path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write curve file: {}", output_path.display()))?;
    Ok(())
}
