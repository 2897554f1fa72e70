use std::collections::BTreeMap;

use sprs::CsVec;

use super::Vocabulary;

/// Sparse bag-of-words counts over a frozen vocabulary.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    counts: CsVec<u32>,
}

impl FeatureVector {
    /// All-zero vector with `dim` columns.
    pub fn zeros(dim: usize) -> Self {
        Self {
            counts: CsVec::empty(dim),
        }
    }

    /// Build from `(column, count)` pairs; zero counts are skipped and repeated
    /// columns accumulate. Columns at or beyond `dim` are ignored.
    pub fn from_pairs(dim: usize, pairs: impl IntoIterator<Item = (usize, u32)>) -> Self {
        let mut merged: BTreeMap<usize, u32> = BTreeMap::new();
        for (column, count) in pairs {
            if column < dim && count > 0 {
                *merged.entry(column).or_default() += count;
            }
        }
        let (indices, data): (Vec<usize>, Vec<u32>) = merged.into_iter().unzip();
        Self {
            counts: CsVec::new(dim, indices, data),
        }
    }

    /// Number of addressable columns, equal to the vocabulary size.
    pub fn dim(&self) -> usize {
        self.counts.dim()
    }

    /// Number of non-zero columns.
    pub fn nnz(&self) -> usize {
        self.counts.nnz()
    }

    pub fn get(&self, column: usize) -> u32 {
        self.counts.get(column).copied().unwrap_or(0)
    }

    /// Non-zero `(column, count)` pairs in ascending column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.counts.iter().map(|(column, &count)| (column, count))
    }

    /// Dot product with a dense weight slice of the same dimensionality.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.iter()
            .map(|(column, count)| weights[column] * f64::from(count))
            .sum()
    }

    pub fn as_sparse(&self) -> &CsVec<u32> {
        &self.counts
    }
}

impl PartialEq for FeatureVector {
    fn eq(&self, other: &Self) -> bool {
        self.dim() == other.dim() && self.iter().eq(other.iter())
    }
}

/// Count the in-vocabulary tokens of one document.
///
/// Tokens outside the vocabulary are ignored.
pub fn encode<T: AsRef<str>>(tokens: &[T], vocab: &Vocabulary) -> FeatureVector {
    FeatureVector::from_pairs(
        vocab.len(),
        tokens
            .iter()
            .filter_map(|token| vocab.index_of(token.as_ref()))
            .map(|column| (column, 1)),
    )
}

/// Encode every document of a tokenized corpus, preserving order.
pub fn encode_corpus<D, T>(corpus: &[D], vocab: &Vocabulary) -> Vec<FeatureVector>
where
    D: AsRef<[T]>,
    T: AsRef<str>,
{
    corpus
        .iter()
        .map(|document| encode(document.as_ref(), vocab))
        .collect()
}
