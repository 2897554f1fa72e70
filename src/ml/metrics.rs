//! Evaluation metrics for the binary sentiment classifier.

use serde::Serialize;

use super::logreg::{LogRegModel, TrainError};
use crate::dataset::{Dataset, Label};

/// Class treated as positive by [`f1_score`] and the headline precision/recall.
pub const POSITIVE_LABEL: Label = Label::Offensive;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Matrix sized for [`Label`].
    pub fn binary() -> Self {
        Self::new(Label::ALL.len())
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn record(&mut self, truth: Label, predicted: Label) {
        self.add(truth.index(), predicted.index());
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&v| u64::from(v)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    pub f1: f64,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    let mut stats = Vec::with_capacity(k);
    for class_idx in 0..k {
        let tp = f64::from(cm.get(class_idx, class_idx));
        let mut fp = 0f64;
        let mut fn_ = 0f64;
        let mut support = 0u32;
        for j in 0..k {
            let v = cm.get(class_idx, j);
            support = support.saturating_add(v);
            if j != class_idx {
                fn_ += f64::from(v);
            }
        }
        for i in 0..k {
            if i != class_idx {
                fp += f64::from(cm.get(i, class_idx));
            }
        }
        let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
        let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
        stats.push(PerClassStats {
            precision,
            recall,
            f1: harmonic_mean(precision, recall),
            support,
        });
    }
    stats
}

/// Compute overall accuracy from a confusion matrix; `0.0` when empty.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let mut correct = 0u64;
    for class_idx in 0..cm.n_classes {
        correct += u64::from(cm.get(class_idx, class_idx));
    }
    let total = cm.total();
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

/// F1 of [`POSITIVE_LABEL`]; `0.0` when precision and recall are both zero.
pub fn f1_score(cm: &ConfusionMatrix) -> f64 {
    precision_recall_by_class(cm)
        .get(POSITIVE_LABEL.index())
        .map(|stats| stats.f1)
        .unwrap_or(0.0)
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Held-out scores of a trained model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub accuracy: f64,
    /// F1 of the offensive class.
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub confusion: ConfusionMatrix,
    /// Indexed by [`Label::index`].
    pub per_class: Vec<PerClassStats>,
}

impl Evaluation {
    pub fn from_confusion(confusion: ConfusionMatrix) -> Self {
        let per_class = precision_recall_by_class(&confusion);
        let positive = per_class.get(POSITIVE_LABEL.index());
        Self {
            accuracy: accuracy(&confusion),
            f1: positive.map(|s| s.f1).unwrap_or(0.0),
            precision: positive.map(|s| s.precision).unwrap_or(0.0),
            recall: positive.map(|s| s.recall).unwrap_or(0.0),
            confusion,
            per_class,
        }
    }

    /// Number of scored rows.
    pub fn support(&self) -> u64 {
        self.confusion.total()
    }
}

/// Predict every row of `test` and score the predictions against its labels.
pub fn evaluate(model: &LogRegModel, test: &Dataset) -> Result<Evaluation, TrainError> {
    let mut confusion = ConfusionMatrix::binary();
    for example in test {
        let predicted = model.predict(&example.features)?;
        confusion.record(example.label, predicted);
    }
    let evaluation = Evaluation::from_confusion(confusion);
    tracing::info!(
        rows = test.len(),
        accuracy = evaluation.accuracy,
        f1 = evaluation.f1,
        "Model evaluated"
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Example;
    use crate::features::FeatureVector;

    fn matrix(pairs: &[(Label, Label)]) -> ConfusionMatrix {
        let mut cm = ConfusionMatrix::binary();
        for &(truth, predicted) in pairs {
            cm.record(truth, predicted);
        }
        cm
    }

    #[test]
    fn scores_offensive_as_positive_class() {
        use Label::{Neutral as N, Offensive as O};
        // tp=2 fp=1 fn=1 tn=4
        let cm = matrix(&[(O, O), (O, O), (N, O), (O, N), (N, N), (N, N), (N, N), (N, N)]);
        let eval = Evaluation::from_confusion(cm);
        assert!((eval.accuracy - 0.75).abs() < 1e-12);
        assert!((eval.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((eval.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((eval.f1 - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(eval.per_class[Label::Neutral.index()].support, 5);
        assert_eq!(eval.per_class[Label::Offensive.index()].support, 3);
        assert_eq!(eval.support(), 8);
    }

    #[test]
    fn no_positive_rows_and_no_positive_predictions_give_zero_f1() {
        let cm = matrix(&[(Label::Neutral, Label::Neutral); 4]);
        assert_eq!(f1_score(&cm), 0.0);
        assert_eq!(accuracy(&cm), 1.0);
    }

    #[test]
    fn empty_matrix_scores_zero() {
        let eval = Evaluation::from_confusion(ConfusionMatrix::binary());
        assert_eq!(eval.accuracy, 0.0);
        assert_eq!(eval.f1, 0.0);
        assert_eq!(eval.support(), 0);
    }

    #[test]
    fn out_of_range_classes_are_ignored() {
        let mut cm = ConfusionMatrix::binary();
        cm.add(2, 0);
        cm.add(0, 5);
        assert_eq!(cm.total(), 0);
    }

    #[test]
    fn evaluate_predicts_each_test_row() {
        let model = LogRegModel::new(vec![3.0, -3.0], 0.0);
        let test = Dataset::new(vec![
            Example {
                features: FeatureVector::from_pairs(2, [(0, 1)]),
                label: Label::Offensive,
            },
            Example {
                features: FeatureVector::from_pairs(2, [(1, 1)]),
                label: Label::Neutral,
            },
            Example {
                features: FeatureVector::from_pairs(2, [(1, 2)]),
                label: Label::Offensive,
            },
        ]);
        let eval = evaluate(&model, &test).unwrap();
        assert_eq!(eval.confusion.get(1, 1), 1);
        assert_eq!(eval.confusion.get(1, 0), 1);
        assert_eq!(eval.confusion.get(0, 0), 1);
        assert!((eval.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&eval.f1));
        assert!((eval.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn evaluate_propagates_dimension_mismatch() {
        let model = LogRegModel::zeros(2);
        let test = Dataset::new(vec![Example {
            features: FeatureVector::zeros(3),
            label: Label::Neutral,
        }]);
        assert!(matches!(
            evaluate(&model, &test),
            Err(TrainError::DimensionMismatch { .. })
        ));
    }
}
