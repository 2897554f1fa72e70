use super::{LogRegModel, TrainError, sigmoid, softplus};
use crate::dataset::Dataset;

/// Sufficient-decrease constant of the Armijo line search.
const ARMIJO: f64 = 1e-4;
/// Smallest step tried before the line search gives up.
const MIN_STEP: f64 = 1e-12;

/// Optimizer settings for [`train_logreg`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOptions {
    /// Inverse L2 regularization strength; smaller values shrink weights harder.
    pub c: f64,
    /// Upper bound on gradient steps.
    pub max_iter: usize,
    /// Stop once the gradient L2 norm drops below this value.
    pub tolerance: f64,
    /// Initial step size; adapted by the line search afterwards.
    pub learning_rate: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            tolerance: 1e-4,
            learning_rate: 1.0,
        }
    }
}

/// Convergence trace of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Accepted gradient steps.
    pub iterations: usize,
    /// Whether the gradient norm fell below the tolerance.
    pub converged: bool,
    /// Gradient norm at the returned parameters.
    pub gradient_norm: f64,
    /// Objective before the first step and after every accepted step.
    pub objective_history: Vec<f64>,
}

impl TrainReport {
    pub fn final_objective(&self) -> Option<f64> {
        self.objective_history.last().copied()
    }
}

/// Regularized mean logistic loss over a fixed training set.
struct Objective<'a> {
    data: &'a Dataset,
    dim: usize,
    inv_c: f64,
}

impl Objective<'_> {
    fn value(&self, weights: &[f64], bias: f64) -> f64 {
        let n = self.data.len() as f64;
        let loss: f64 = self
            .data
            .iter()
            .map(|example| {
                let z = example.features.dot(weights) + bias;
                softplus(z) - example.label.target() * z
            })
            .sum();
        let penalty: f64 = weights.iter().map(|w| w * w).sum();
        (loss + 0.5 * self.inv_c * penalty) / n
    }

    fn gradient(&self, weights: &[f64], bias: f64) -> (Vec<f64>, f64) {
        let n = self.data.len() as f64;
        let mut grad_w: Vec<f64> = weights.iter().map(|w| self.inv_c * w).collect();
        let mut grad_b = 0.0;
        for example in self.data {
            let residual = sigmoid(example.features.dot(weights) + bias) - example.label.target();
            for (column, count) in example.features.iter() {
                grad_w[column] += residual * f64::from(count);
            }
            grad_b += residual;
        }
        for g in &mut grad_w {
            *g /= n;
        }
        (grad_w, grad_b / n)
    }
}

/// Fit a logistic regression model by full-batch gradient descent.
///
/// Each step backtracks until the objective decreases sufficiently, so the
/// objective history is non-increasing. Weights start at zero and the bias is
/// not regularized.
pub fn train_logreg(
    dataset: &Dataset,
    options: &TrainOptions,
) -> Result<(LogRegModel, TrainReport), TrainError> {
    let dim = dataset.dim().ok_or(TrainError::EmptyTrainingSet)?;
    if let Some(bad) = dataset.iter().find(|example| example.features.dim() != dim) {
        return Err(TrainError::DimensionMismatch {
            expected: dim,
            found: bad.features.dim(),
        });
    }

    let objective = Objective {
        data: dataset,
        dim,
        inv_c: 1.0 / options.c.max(f64::MIN_POSITIVE),
    };
    let mut weights = vec![0.0f64; objective.dim];
    let mut bias = 0.0f64;
    let mut current = objective.value(&weights, bias);
    let mut history = vec![current];
    let mut step = if options.learning_rate > 0.0 {
        options.learning_rate
    } else {
        1.0
    };
    let mut converged = false;
    let mut gradient_norm = f64::INFINITY;
    let mut iterations = 0usize;

    while iterations < options.max_iter {
        let (grad_w, grad_b) = objective.gradient(&weights, bias);
        let grad_sq = grad_w.iter().map(|g| g * g).sum::<f64>() + grad_b * grad_b;
        gradient_norm = grad_sq.sqrt();
        if gradient_norm < options.tolerance {
            converged = true;
            break;
        }

        let mut accepted = None;
        while step >= MIN_STEP {
            let candidate_w: Vec<f64> = weights
                .iter()
                .zip(&grad_w)
                .map(|(w, g)| w - step * g)
                .collect();
            let candidate_b = bias - step * grad_b;
            let value = objective.value(&candidate_w, candidate_b);
            if value <= current - ARMIJO * step * grad_sq {
                accepted = Some((candidate_w, candidate_b, value));
                break;
            }
            step *= 0.5;
        }
        let Some((next_w, next_b, value)) = accepted else {
            tracing::debug!(iterations, gradient_norm, "Line search stalled");
            break;
        };
        weights = next_w;
        bias = next_b;
        current = value;
        history.push(current);
        iterations += 1;
        tracing::trace!(iteration = iterations, objective = current, step, "Gradient step");
        step *= 2.0;
    }

    if !converged && iterations == options.max_iter {
        let (grad_w, grad_b) = objective.gradient(&weights, bias);
        gradient_norm = (grad_w.iter().map(|g| g * g).sum::<f64>() + grad_b * grad_b).sqrt();
        converged = gradient_norm < options.tolerance;
    }
    if !converged {
        tracing::warn!(
            iterations,
            gradient_norm,
            tolerance = options.tolerance,
            "Logistic regression stopped before reaching the tolerance"
        );
    }
    tracing::info!(
        rows = dataset.len(),
        features = dim,
        iterations,
        converged,
        objective = current,
        "Logistic regression trained"
    );

    Ok((
        LogRegModel::new(weights, bias),
        TrainReport {
            iterations,
            converged,
            gradient_norm,
            objective_history: history,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Example, Label};
    use crate::features::FeatureVector;

    /// Offensive rows use only column 0, neutral rows only column 1.
    fn separable(rows: usize) -> Dataset {
        (0..rows)
            .map(|i| {
                let count = 1 + (i % 3) as u32;
                if i % 2 == 0 {
                    Example {
                        features: FeatureVector::from_pairs(2, [(0, count)]),
                        label: Label::Offensive,
                    }
                } else {
                    Example {
                        features: FeatureVector::from_pairs(2, [(1, count)]),
                        label: Label::Neutral,
                    }
                }
            })
            .collect()
    }

    fn training_accuracy(model: &LogRegModel, data: &Dataset) -> f64 {
        let hits = data
            .iter()
            .filter(|example| model.predict(&example.features).unwrap() == example.label)
            .count();
        hits as f64 / data.len() as f64
    }

    #[test]
    fn separable_data_is_fit_within_iteration_cap() {
        let data = separable(40);
        let options = TrainOptions::default();
        let (model, report) = train_logreg(&data, &options).unwrap();
        assert!(report.iterations <= options.max_iter);
        assert!(training_accuracy(&model, &data) >= 0.99);
        assert!(model.weights()[0] > 0.0);
        assert!(model.weights()[1] < 0.0);
    }

    #[test]
    fn objective_never_increases() {
        let mut data: Vec<Example> = separable(30).examples().to_vec();
        data.push(Example {
            features: FeatureVector::from_pairs(2, [(0, 1), (1, 1)]),
            label: Label::Neutral,
        });
        data.push(Example {
            features: FeatureVector::from_pairs(2, [(1, 2)]),
            label: Label::Offensive,
        });
        let data = Dataset::new(data);
        let (_, report) = train_logreg(&data, &TrainOptions::default()).unwrap();
        assert!(report.objective_history.len() >= 2);
        for pair in report.objective_history.windows(2) {
            assert!(pair[1] <= pair[0], "{} > {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn converges_to_small_gradient_on_overlapping_data() {
        let data: Dataset = (0..20)
            .map(|i| Example {
                features: FeatureVector::from_pairs(1, [(0, 1)]),
                label: if i < 15 { Label::Offensive } else { Label::Neutral },
            })
            .collect();
        let options = TrainOptions {
            tolerance: 1e-6,
            ..TrainOptions::default()
        };
        let (model, report) = train_logreg(&data, &options).unwrap();
        assert!(report.converged);
        assert!(report.gradient_norm < 1e-6);
        let p = model
            .predict_proba(&FeatureVector::from_pairs(1, [(0, 1)]))
            .unwrap();
        assert!(p > 0.5 && p < 0.75 + 1e-3);
    }

    #[test]
    fn stronger_regularization_shrinks_weights() {
        let data = separable(40);
        let (loose, _) = train_logreg(&data, &TrainOptions::default()).unwrap();
        let (tight, _) = train_logreg(
            &data,
            &TrainOptions {
                c: 0.01,
                ..TrainOptions::default()
            },
        )
        .unwrap();
        let norm = |m: &LogRegModel| m.weights().iter().map(|w| w * w).sum::<f64>();
        assert!(norm(&tight) < norm(&loose));
    }

    #[test]
    fn iteration_cap_bounds_the_run() {
        let data = separable(10);
        let options = TrainOptions {
            max_iter: 3,
            tolerance: 0.0,
            ..TrainOptions::default()
        };
        let (_, report) = train_logreg(&data, &options).unwrap();
        assert!(report.iterations <= 3);
        assert!(!report.converged);
        assert_eq!(report.objective_history.len(), report.iterations + 1);
    }

    #[test]
    fn empty_training_set_is_rejected() {
        let err = train_logreg(&Dataset::default(), &TrainOptions::default()).unwrap_err();
        assert_eq!(err, TrainError::EmptyTrainingSet);
    }

    #[test]
    fn mixed_dimensionality_is_rejected() {
        let data = Dataset::new(vec![
            Example {
                features: FeatureVector::zeros(2),
                label: Label::Neutral,
            },
            Example {
                features: FeatureVector::zeros(5),
                label: Label::Offensive,
            },
        ]);
        let err = train_logreg(&data, &TrainOptions::default()).unwrap_err();
        assert_eq!(
            err,
            TrainError::DimensionMismatch {
                expected: 2,
                found: 5
            }
        );
    }
}
