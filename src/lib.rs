//! Biclass: Binary Classifier Comparison Library
//!
//! A library for loading labeled tabular data, partitioning it, fitting
//! standard classifiers and comparing them with ROC / precision-recall metrics.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
