//! Binary logistic regression over bag-of-words counts.

use thiserror::Error;

use crate::dataset::Label;
use crate::features::FeatureVector;

mod train;
pub use train::{TrainOptions, TrainReport, train_logreg};

/// Probability at or above which a row is predicted as [`Label::Offensive`].
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainError {
    #[error("Empty training set")]
    EmptyTrainingSet,
    #[error("Feature dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Fitted weights and bias, `p = sigmoid(w·x + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRegModel {
    weights: Vec<f64>,
    bias: f64,
}

impl LogRegModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Model with `dim` zero weights; predicts probability 0.5 everywhere.
    pub fn zeros(dim: usize) -> Self {
        Self::new(vec![0.0; dim], 0.0)
    }

    /// Number of features the model expects.
    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Raw log-odds `w·x + b`.
    pub fn decision_function(&self, x: &FeatureVector) -> Result<f64, TrainError> {
        if x.dim() != self.dim() {
            return Err(TrainError::DimensionMismatch {
                expected: self.dim(),
                found: x.dim(),
            });
        }
        Ok(x.dot(&self.weights) + self.bias)
    }

    /// Probability that `x` belongs to [`Label::Offensive`].
    pub fn predict_proba(&self, x: &FeatureVector) -> Result<f64, TrainError> {
        self.decision_function(x).map(sigmoid)
    }

    pub fn predict(&self, x: &FeatureVector) -> Result<Label, TrainError> {
        let p = self.predict_proba(x)?;
        Ok(if p >= DECISION_THRESHOLD {
            Label::Offensive
        } else {
            Label::Neutral
        })
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow for large `z`.
pub(crate) fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}
