//! End-to-end run: preprocess, vectorize, split, fit and score.

use serde::Serialize;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::dataset::{Dataset, Document, Label, SplitError, split};
use crate::features::{Vocabulary, VocabularyError, build_vocabulary, encode_corpus};
use crate::ml::logreg::{LogRegModel, TrainError, TrainReport, train_logreg};
use crate::ml::metrics::{Evaluation, evaluate};
use crate::text;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Train(#[from] TrainError),
}

/// Stemmed tokens and labels of a corpus, row-aligned with its documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedCorpus {
    pub tokens: Vec<Vec<String>>,
    pub labels: Vec<Label>,
}

impl PreparedCorpus {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token lists of the rows carrying `label`.
    pub fn tokens_for(&self, label: Label) -> impl Iterator<Item = &[String]> + '_ {
        self.tokens
            .iter()
            .zip(&self.labels)
            .filter(move |(_, row_label)| **row_label == label)
            .map(|(tokens, _)| tokens.as_slice())
    }
}

/// Normalize and stem every document.
pub fn prepare_corpus(documents: &[Document]) -> PreparedCorpus {
    let (tokens, labels) = documents
        .iter()
        .map(|document| (text::preprocess(&document.text), document.label))
        .unzip();
    PreparedCorpus { tokens, labels }
}

/// Everything produced by a [`run`].
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub vocabulary: Vocabulary,
    pub model: LogRegModel,
    pub training: TrainReport,
    pub evaluation: Evaluation,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Printable digest of a [`PipelineOutcome`].
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub documents: usize,
    pub vocabulary_size: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub iterations: usize,
    pub converged: bool,
    pub evaluation: Evaluation,
}

impl PipelineOutcome {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            documents: self.train_indices.len() + self.test_indices.len(),
            vocabulary_size: self.vocabulary.len(),
            train_rows: self.train_indices.len(),
            test_rows: self.test_indices.len(),
            iterations: self.training.iterations,
            converged: self.training.converged,
            evaluation: self.evaluation.clone(),
        }
    }
}

/// Run the full classification pipeline over `documents`.
pub fn run(documents: &[Document], config: &PipelineConfig) -> Result<PipelineOutcome, PipelineError> {
    let prepared = prepare_corpus(documents);
    tracing::info!(documents = prepared.len(), "Corpus preprocessed");
    run_prepared(&prepared, config)
}

/// Same as [`run`] for a corpus that was already tokenized.
pub fn run_prepared(
    prepared: &PreparedCorpus,
    config: &PipelineConfig,
) -> Result<PipelineOutcome, PipelineError> {
    let vocabulary = build_vocabulary(&prepared.tokens, &config.vectorizer.options())?;
    tracing::info!(
        documents = prepared.len(),
        vocabulary_size = vocabulary.len(),
        min_df = config.vectorizer.min_df,
        max_df = config.vectorizer.max_df,
        "Vocabulary built"
    );

    let dataset = Dataset::from_parts(encode_corpus(&prepared.tokens, &vocabulary), &prepared.labels);
    let parts = split(&dataset, config.split.test_fraction, config.split.seed)?;
    tracing::info!(
        train = parts.train.len(),
        test = parts.test.len(),
        seed = config.split.seed,
        "Dataset split"
    );

    let (model, training) = train_logreg(&parts.train, &config.training.options())?;
    let evaluation = evaluate(&model, &parts.test)?;

    Ok(PipelineOutcome {
        vocabulary,
        model,
        training,
        evaluation,
        train_indices: parts.train_indices,
        test_indices: parts.test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorizerSettings;

    fn corpus() -> Vec<Document> {
        let neutral = [
            "@user enjoying sunshine with family #happy",
            "lovely morning walking outside #blessed",
            "family dinner tonight was wonderful",
            "sunshine makes everything lovely #happy",
        ];
        let offensive = [
            "@user horrible racist comments again #trump",
            "racist hateful people everywhere #politics",
            "hateful horrible attitude from them",
            "stop racist behaviour now #politics",
        ];
        (0..40)
            .map(|i| {
                if i % 2 == 0 {
                    Document::new(neutral[i / 2 % 4], Label::Neutral)
                } else {
                    Document::new(offensive[i / 2 % 4], Label::Offensive)
                }
            })
            .collect()
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            vectorizer: VectorizerSettings {
                min_df: 2,
                max_df: 0.9,
            },
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn prepare_corpus_keeps_rows_aligned() {
        let docs = vec![
            Document::new("@user This is #great!!", Label::Neutral),
            Document::new("", Label::Offensive),
        ];
        let prepared = prepare_corpus(&docs);
        assert_eq!(prepared.tokens, vec![vec!["thi".to_string(), "#great".to_string()], vec![]]);
        assert_eq!(prepared.labels, vec![Label::Neutral, Label::Offensive]);
        assert_eq!(prepared.tokens_for(Label::Offensive).count(), 1);
    }

    #[test]
    fn separable_corpus_scores_well() {
        let outcome = run(&corpus(), &config()).unwrap();
        let summary = outcome.summary();
        assert_eq!(summary.documents, 40);
        assert_eq!(summary.test_rows, 10);
        assert_eq!(summary.train_rows, 30);
        assert!(!outcome.vocabulary.is_empty());
        assert_eq!(outcome.model.dim(), outcome.vocabulary.len());
        assert!(summary.evaluation.accuracy >= 0.9);
        assert!((0.0..=1.0).contains(&summary.evaluation.f1));
    }

    #[test]
    fn run_is_deterministic() {
        let first = run(&corpus(), &config()).unwrap();
        let second = run(&corpus(), &config()).unwrap();
        assert_eq!(first.test_indices, second.test_indices);
        assert_eq!(first.model, second.model);
        assert_eq!(first.evaluation, second.evaluation);
    }

    #[test]
    fn default_min_df_rejects_small_corpus() {
        let err = run(&corpus(), &PipelineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Vocabulary(VocabularyError::EmptyVocabulary { .. })
        ));
    }

    #[test]
    fn invalid_test_fraction_surfaces_as_split_error() {
        let mut config = config();
        config.split.test_fraction = 1.0;
        assert!(matches!(
            run(&corpus(), &config),
            Err(PipelineError::Split(SplitError::InvalidFraction(_)))
        ));
    }
}
