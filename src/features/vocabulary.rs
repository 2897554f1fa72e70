use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::text::is_stop_word;

/// Errors raised while selecting a vocabulary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VocabularyError {
    /// Every token was pruned by the frequency bounds or the stop-word list.
    #[error(
        "No token survives min_df={min_df}, max_df={max_df} over {documents} documents"
    )]
    EmptyVocabulary {
        documents: usize,
        min_df: usize,
        max_df: f64,
    },
    /// `max_df` must be a fraction in `(0, 1]`.
    #[error("max_df must lie in (0, 1], got {0}")]
    InvalidMaxDf(f64),
}

/// Document-frequency bounds for vocabulary selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VocabularyOptions {
    /// Minimum number of documents a token must appear in.
    pub min_df: usize,
    /// Maximum share of documents a token may appear in.
    pub max_df: f64,
}

impl Default for VocabularyOptions {
    fn default() -> Self {
        Self {
            min_df: 1,
            max_df: 1.0,
        }
    }
}

/// Frozen token → column mapping shared by the encoder and the model.
///
/// Columns are ordered by descending document frequency; equal frequencies keep
/// the order in which tokens were first seen in the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    document_frequency: Vec<usize>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Number of columns.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column of `term`, if selected.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Term stored at `index`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Document frequency observed for the term at `index`.
    pub fn document_frequency(&self, index: usize) -> Option<usize> {
        self.document_frequency.get(index).copied()
    }
}

struct TermStats<'a> {
    term: &'a str,
    df: usize,
    first_seen: usize,
}

/// Select the vocabulary of a tokenized corpus.
///
/// A token is kept when `min_df <= df <= max_df * documents` and it is not a stop
/// word, where `df` counts documents containing the token at least once.
pub fn build_vocabulary<D, T>(
    corpus: &[D],
    options: &VocabularyOptions,
) -> Result<Vocabulary, VocabularyError>
where
    D: AsRef<[T]>,
    T: AsRef<str>,
{
    if !(options.max_df > 0.0 && options.max_df <= 1.0) {
        return Err(VocabularyError::InvalidMaxDf(options.max_df));
    }

    let mut stats: Vec<TermStats<'_>> = Vec::new();
    let mut slot_by_term: HashMap<&str, usize> = HashMap::new();
    let mut seen_in_doc: HashSet<&str> = HashSet::new();
    for document in corpus {
        seen_in_doc.clear();
        for token in document.as_ref() {
            let token = token.as_ref();
            if !seen_in_doc.insert(token) {
                continue;
            }
            match slot_by_term.get(token) {
                Some(&slot) => stats[slot].df += 1,
                None => {
                    slot_by_term.insert(token, stats.len());
                    stats.push(TermStats {
                        term: token,
                        df: 1,
                        first_seen: stats.len(),
                    });
                }
            }
        }
    }

    let documents = corpus.len();
    let max_count = options.max_df * documents as f64;
    let mut kept: Vec<TermStats<'_>> = stats
        .into_iter()
        .filter(|entry| entry.df >= options.min_df && entry.df as f64 <= max_count)
        .filter(|entry| !is_stop_word(entry.term))
        .collect();
    if kept.is_empty() {
        return Err(VocabularyError::EmptyVocabulary {
            documents,
            min_df: options.min_df,
            max_df: options.max_df,
        });
    }
    kept.sort_by_key(|entry| (Reverse(entry.df), entry.first_seen));

    let terms: Vec<String> = kept.iter().map(|entry| entry.term.to_string()).collect();
    let document_frequency = kept.iter().map(|entry| entry.df).collect();
    let index = terms
        .iter()
        .cloned()
        .enumerate()
        .map(|(idx, term)| (term, idx))
        .collect();
    tracing::debug!(
        documents,
        candidates = slot_by_term.len(),
        selected = terms.len(),
        "Vocabulary built"
    );
    Ok(Vocabulary {
        terms,
        document_frequency,
        index,
    })
}
