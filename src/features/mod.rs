//! Bag-of-words feature extraction.
//!
//! A [`Vocabulary`] is selected once from the whole tokenized corpus, then every
//! document is encoded against it into a sparse [`FeatureVector`] of counts.

mod encode;
mod vocabulary;

pub use encode::{FeatureVector, encode, encode_corpus};
pub use vocabulary::{Vocabulary, VocabularyError, VocabularyOptions, build_vocabulary};
