//! In-memory labeled dataset
//!
//! A `Dataset` is the cleaned, complete-case form of a raw table: a row-major
//! matrix of numeric attributes plus one binary label per record. It is
//! immutable once built; subsetting and column selection return new values.

use serde::Serialize;

/// Names of the two classes. `positive` is the class whose probability the
/// models estimate (e.g. "malignant").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassNames {
    pub positive: String,
    pub negative: String,
}

impl ClassNames {
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    /// Name for a binary label
    pub fn name(&self, positive: bool) -> &str {
        if positive {
            &self.positive
        } else {
            &self.negative
        }
    }
}

/// Complete-case labeled records with named numeric attributes
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
    labels: Vec<bool>,
    classes: ClassNames,
}

impl Dataset {
    /// Build a dataset from row-major records.
    ///
    /// # Panics
    /// Panics if `rows` and `labels` differ in length or any row does not
    /// match the number of feature names.
    pub fn new(
        feature_names: Vec<String>,
        rows: Vec<Vec<f64>>,
        labels: Vec<bool>,
        classes: ClassNames,
    ) -> Self {
        assert_eq!(rows.len(), labels.len(), "one label per record");
        assert!(
            rows.iter().all(|r| r.len() == feature_names.len()),
            "every record must have one value per feature"
        );
        Self {
            feature_names,
            rows,
            labels,
            classes,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn labels(&self) -> &[bool] {
        &self.labels
    }

    pub fn label(&self, index: usize) -> bool {
        self.labels[index]
    }

    pub fn classes(&self) -> &ClassNames {
        &self.classes
    }

    /// Number of records labeled with the positive class
    pub fn positive_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l).count()
    }

    pub fn negative_count(&self) -> usize {
        self.len() - self.positive_count()
    }

    /// Share of records in the positive class (0.0 for an empty dataset)
    pub fn positive_rate(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.positive_count() as f64 / self.len() as f64
        }
    }

    /// Share of records in the smaller class
    pub fn minority_rate(&self) -> f64 {
        let p = self.positive_rate();
        p.min(1.0 - p)
    }

    /// Values of one attribute across all records
    pub fn column(&self, feature: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[feature]).collect()
    }

    /// New dataset holding the records at `indices`, in that order
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            classes: self.classes.clone(),
        }
    }

    /// New dataset without the named attributes (unknown names are ignored)
    pub fn without_features(&self, names: &[String]) -> Dataset {
        let keep: Vec<usize> = self
            .feature_names
            .iter()
            .enumerate()
            .filter(|(_, name)| !names.contains(name))
            .map(|(i, _)| i)
            .collect();

        Dataset {
            feature_names: keep.iter().map(|&i| self.feature_names[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| keep.iter().map(|&i| r[i]).collect())
                .collect(),
            labels: self.labels.clone(),
            classes: self.classes.clone(),
        }
    }

    /// Same labels with every record replaced by `f(record)`
    pub fn map_rows<F>(&self, f: F) -> Dataset
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        Dataset {
            feature_names: self.feature_names.clone(),
            rows: self.rows.iter().map(|r| f(r)).collect(),
            labels: self.labels.clone(),
            classes: self.classes.clone(),
        }
    }
}
