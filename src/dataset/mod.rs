//! Labeled documents, encoded datasets and their train/test partition.

pub mod corpus;
mod split;

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;

pub use split::{Split, SplitError, split, split_indices};

/// Binary sentiment label as encoded in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    /// Label `0`: neutral or positive tweets.
    Neutral,
    /// Label `1`: offensive or negative tweets. Treated as the positive class by metrics.
    Offensive,
}

impl Label {
    /// Both labels in value order.
    pub const ALL: [Label; 2] = [Label::Neutral, Label::Offensive];

    /// Parse the raw integer used by the corpus.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Label::Neutral),
            1 => Some(Label::Offensive),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Label::Neutral => 0,
            Label::Offensive => 1,
        }
    }

    /// Row/column used in confusion matrices.
    pub fn index(self) -> usize {
        usize::from(self.value())
    }

    /// Regression target (`0.0` or `1.0`) used by the logistic loss.
    pub fn target(self) -> f64 {
        f64::from(self.value())
    }

    pub fn name(self) -> &'static str {
        match self {
            Label::Neutral => "neutral",
            Label::Offensive => "offensive",
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.value()
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Label::from_value(i64::from(value)).ok_or_else(|| format!("invalid label {value}"))
    }
}

/// Raw labeled text as delivered by the corpus loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub label: Label,
}

impl Document {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// One encoded row.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub features: FeatureVector,
    pub label: Label,
}

/// Ordered collection of encoded rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    examples: Vec<Example>,
}

impl Dataset {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    /// Pair feature vectors with labels row by row; extra items on either side are dropped.
    pub fn from_parts(features: Vec<FeatureVector>, labels: &[Label]) -> Self {
        features
            .into_iter()
            .zip(labels.iter().copied())
            .map(|(features, label)| Example { features, label })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.examples.iter()
    }

    /// Feature dimensionality of the first row.
    pub fn dim(&self) -> Option<usize> {
        self.examples.first().map(|example| example.features.dim())
    }

    /// Number of rows carrying `label`.
    pub fn count_label(&self, label: Label) -> usize {
        self.examples
            .iter()
            .filter(|example| example.label == label)
            .count()
    }

    /// Copy the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        indices
            .iter()
            .filter_map(|&idx| self.examples.get(idx).cloned())
            .collect()
    }
}

impl FromIterator<Example> for Dataset {
    fn from_iter<I: IntoIterator<Item = Example>>(iter: I) -> Self {
        Self {
            examples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Example;
    type IntoIter = std::slice::Iter<'a, Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}
