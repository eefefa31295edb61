//! Threshold-swept ROC and precision-recall curves
//!
//! Scores are swept from highest to lowest; records with equal scores enter
//! the positive side together, so ties produce a single diagonal segment.
//! Areas use the trapezoidal rule over the resulting points.

use serde::Serialize;

/// One point of a threshold sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Records scoring at least this value are called positive
    pub threshold: f64,
    /// FPR for ROC, recall for PR
    pub x: f64,
    /// TPR for ROC, precision for PR
    pub y: f64,
}

/// A threshold-swept curve and the area under it
#[derive(Debug, Clone, Serialize)]
pub struct Curve {
    pub points: Vec<CurvePoint>,
    pub area: f64,
}

/// Cumulative confusion counts after each distinct score, highest first
fn sweep(scores: &[f64], labels: &[bool]) -> Vec<(f64, usize, usize)> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut steps = Vec::new();
    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]].total_cmp(&threshold).is_eq() {
            if labels[order[i]] {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        steps.push((threshold, tp, fp));
    }
    steps
}

/// Trapezoidal area under a polyline ordered by x
pub fn trapezoid_area(points: &[CurvePoint]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].x - w[0].x) * (w[0].y + w[1].y) / 2.0)
        .sum()
}

/// ROC curve (true-positive rate against false-positive rate).
///
/// Starts at (0, 0) with an infinite threshold and ends at (1, 1). Returns
/// `None` unless both classes are present.
pub fn roc_curve(scores: &[f64], labels: &[bool]) -> Option<Curve> {
    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut points = vec![CurvePoint {
        threshold: f64::INFINITY,
        x: 0.0,
        y: 0.0,
    }];
    points.extend(sweep(scores, labels).into_iter().map(|(threshold, tp, fp)| CurvePoint {
        threshold,
        x: fp as f64 / negatives as f64,
        y: tp as f64 / positives as f64,
    }));

    let area = trapezoid_area(&points);
    Some(Curve { points, area })
}

/// Precision-recall curve.
///
/// The first point sits at recall 0 with the precision of the highest-score
/// group, so a constant score yields an area equal to the positive rate.
/// Returns `None` unless both classes are present.
pub fn pr_curve(scores: &[f64], labels: &[bool]) -> Option<Curve> {
    let positives = labels.iter().filter(|&&l| l).count();
    if positives == 0 || positives == labels.len() {
        return None;
    }

    let steps = sweep(scores, labels);
    let mut points: Vec<CurvePoint> = steps
        .into_iter()
        .map(|(threshold, tp, fp)| CurvePoint {
            threshold,
            x: tp as f64 / positives as f64,
            y: tp as f64 / (tp + fp) as f64,
        })
        .collect();

    let first = points[0];
    points.insert(
        0,
        CurvePoint {
            threshold: f64::INFINITY,
            x: 0.0,
            y: first.y,
        },
    );

    let area = trapezoid_area(&points);
    Some(Curve { points, area })
}
