//! Classifier training and evaluation.

pub mod logreg;
pub mod metrics;
