//! Sentiment classification of short social-media posts.
//!
//! Raw tweets are cleaned, stemmed and counted against a document-frequency
//! vocabulary, then a logistic regression model is fit on a seeded train split
//! and scored on the held-out rows.

/// Application directory helpers.
pub mod app_dirs;
/// TOML pipeline settings.
pub mod config;
/// Documents, labels, encoded datasets and splitting.
pub mod dataset;
/// Vocabulary selection and count encoding.
pub mod features;
/// Logging setup.
pub mod logging;
/// Logistic regression and evaluation metrics.
pub mod ml;
/// End-to-end orchestration.
pub mod pipeline;
/// Per-label term and hashtag summaries.
pub mod report;
/// Cleanup, stemming and stop words.
pub mod text;
