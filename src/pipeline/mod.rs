//! Pipeline module - load, clean, split, train, evaluate and rank

pub mod cleaner;
pub mod compare;
pub mod config;
pub mod curves;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod label;
pub mod loader;
pub mod missing;
pub mod models;
pub mod redundancy;
pub mod scaler;
pub mod split;

pub use cleaner::*;
pub use compare::*;
pub use config::*;
pub use curves::{pr_curve, roc_curve, Curve, CurvePoint};
pub use dataset::*;
pub use error::*;
pub use evaluate::*;
pub use label::*;
pub use loader::*;
pub use missing::*;
pub use models::{
    train_model, FittedModel, KnnSearch, KnnSelection, ModelKind, Prediction, TrainedModel,
    TrainingConfig,
};
pub use redundancy::*;
pub use scaler::*;
pub use split::*;
