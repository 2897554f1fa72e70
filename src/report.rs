//! Frequency summaries of a corpus: most common stemmed terms and hashtags per label.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::dataset::{Document, Label};
use crate::pipeline::PreparedCorpus;
use crate::text::is_stop_word;

fn hashtag_regex() -> &'static Regex {
    static HASHTAG: OnceLock<Regex> = OnceLock::new();
    HASHTAG.get_or_init(|| Regex::new(r"#(\w+)").expect("hashtag regex must compile"))
}

/// Hashtag bodies (without `#`) in order of appearance.
pub fn extract_hashtags(text: &str) -> Vec<&str> {
    hashtag_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// The `n` most frequent items, by descending count; ties keep first-seen order.
pub fn top_counts<I, S>(items: I, n: usize) -> Vec<TermCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: Vec<TermCount> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for item in items {
        let item = item.as_ref();
        match slots.get(item) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(item.to_string(), counts.len());
                counts.push(TermCount {
                    term: item.to_string(),
                    count: 1,
                });
            }
        }
    }
    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Which documents a [`ClassSummary`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    All,
    Label(Label),
}

impl Scope {
    fn includes(self, label: Label) -> bool {
        match self {
            Scope::All => true,
            Scope::Label(wanted) => wanted == label,
        }
    }

    pub fn title(self) -> String {
        match self {
            Scope::All => "all documents".to_string(),
            Scope::Label(label) => format!("label {} ({})", label.value(), label.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub scope: Scope,
    pub documents: usize,
    /// Stemmed tokens, stop words excluded.
    pub top_terms: Vec<TermCount>,
    /// Hashtags from the raw text.
    pub top_hashtags: Vec<TermCount>,
}

impl ClassSummary {
    /// Summarize the rows of `documents` in `scope`. `prepared` must be row-aligned
    /// with `documents`.
    pub fn build(
        scope: Scope,
        documents: &[Document],
        prepared: &PreparedCorpus,
        top_n: usize,
    ) -> Self {
        let rows: Vec<usize> = documents
            .iter()
            .enumerate()
            .filter(|(_, document)| scope.includes(document.label))
            .map(|(row, _)| row)
            .collect();
        let terms = rows
            .iter()
            .filter_map(|&row| prepared.tokens.get(row))
            .flatten()
            .filter(|token| !is_stop_word(token));
        let hashtags = rows
            .iter()
            .flat_map(|&row| extract_hashtags(&documents[row].text));
        Self {
            scope,
            documents: rows.len(),
            top_terms: top_counts(terms, top_n),
            top_hashtags: top_counts(hashtags, top_n),
        }
    }
}

/// Summaries for all documents and for each label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub all: ClassSummary,
    pub neutral: ClassSummary,
    pub offensive: ClassSummary,
}

impl CorpusSummary {
    pub fn sections(&self) -> [&ClassSummary; 3] {
        [&self.all, &self.neutral, &self.offensive]
    }
}

pub fn summarize(documents: &[Document], prepared: &PreparedCorpus, top_n: usize) -> CorpusSummary {
    let summary = CorpusSummary {
        all: ClassSummary::build(Scope::All, documents, prepared, top_n),
        neutral: ClassSummary::build(Scope::Label(Label::Neutral), documents, prepared, top_n),
        offensive: ClassSummary::build(Scope::Label(Label::Offensive), documents, prepared, top_n),
    };
    tracing::info!(
        documents = summary.all.documents,
        neutral = summary.neutral.documents,
        offensive = summary.offensive.documents,
        "Corpus summarized"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::prepare_corpus;

    #[test]
    fn hashtags_are_taken_from_raw_text() {
        assert_eq!(
            extract_hashtags("#love the #sun_shine, not # this #2024!"),
            vec!["love", "sun_shine", "2024"]
        );
        assert!(extract_hashtags("no tags here").is_empty());
    }

    #[test]
    fn top_counts_orders_by_count_then_first_seen() {
        let top = top_counts(["b", "a", "c", "a", "c", "d"], 3);
        let terms: Vec<&str> = top.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["a", "c", "b"]);
        assert_eq!(top[0].count, 2);
        assert!(top_counts(Vec::<String>::new(), 5).is_empty());
        assert!(top_counts(["x"], 0).is_empty());
    }

    #[test]
    fn summaries_split_by_label() {
        let docs = vec![
            Document::new("sunny sunny weekend #happy", Label::Neutral),
            Document::new("sunny morning #happy #summer", Label::Neutral),
            Document::new("awful hateful remarks #angry", Label::Offensive),
        ];
        let prepared = prepare_corpus(&docs);
        let summary = summarize(&docs, &prepared, 2);

        assert_eq!(summary.all.documents, 3);
        assert_eq!(summary.neutral.documents, 2);
        assert_eq!(summary.offensive.documents, 1);
        assert_eq!(summary.neutral.top_hashtags[0], TermCount {
            term: "happy".to_string(),
            count: 2
        });
        assert_eq!(summary.neutral.top_terms[0].term, "sunni");
        assert_eq!(summary.neutral.top_terms[0].count, 3);
        assert_eq!(summary.offensive.top_hashtags.len(), 1);
        assert_eq!(summary.offensive.top_hashtags[0].term, "angry");
        assert!(summary.all.top_terms.len() <= 2);
    }
}
