use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};
use thiserror::Error;

use super::Dataset;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SplitError {
    /// The held-out share must be strictly between 0 and 1.
    #[error("test fraction must lie in (0, 1), got {0}")]
    InvalidFraction(f64),
}

/// Disjoint train/test partition of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    /// Source row of every training example, in training order.
    pub train_indices: Vec<usize>,
    /// Source row of every test example, in test order.
    pub test_indices: Vec<usize>,
}

/// Shuffle `0..len` with a seeded RNG and cut off the first `ceil(test_fraction * len)`
/// positions as the test set.
pub fn split_indices(
    len: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }
    let test_len = ((len as f64) * test_fraction).ceil() as usize;
    let test_len = test_len.min(len);

    let mut order: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let train = order.split_off(test_len);
    Ok((train, order))
}

/// Partition `dataset` reproducibly: the same dataset, fraction and seed always
/// yield the same rows on each side. Labels are not stratified.
pub fn split(dataset: &Dataset, test_fraction: f64, seed: u64) -> Result<Split, SplitError> {
    let (train_indices, test_indices) = split_indices(dataset.len(), test_fraction, seed)?;
    let split = Split {
        train: dataset.select(&train_indices),
        test: dataset.select(&test_indices),
        train_indices,
        test_indices,
    };
    tracing::debug!(
        train = split.train.len(),
        test = split.test.len(),
        seed,
        "Dataset split"
    );
    Ok(split)
}
