//! CSV corpus loading.
//!
//! The corpus is a headered CSV file with a free-text column and an integer
//! 0/1 label column, e.g. the `id,label,tweet` layout of the Twitter sentiment set.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Document, Label};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to open corpus {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("corpus has no `{column}` column")]
    MissingColumn { column: String },
    #[error("invalid label {value:?} on line {line} (expected 0 or 1)")]
    InvalidLabel { line: u64, value: String },
}

/// Column names used to read a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub text_column: String,
    pub label_column: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            text_column: "tweet".to_string(),
            label_column: "label".to_string(),
        }
    }
}

/// Load every row of the CSV file at `path`.
pub fn load_csv(path: &Path, settings: &CorpusSettings) -> Result<Vec<Document>, CorpusError> {
    let file = File::open(path).map_err(|source| CorpusError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let documents = read_csv(file, settings)?;
    tracing::info!(
        path = %path.display(),
        documents = documents.len(),
        "Corpus loaded"
    );
    Ok(documents)
}

/// Read documents from any CSV source with a header row.
pub fn read_csv<R: Read>(reader: R, settings: &CorpusSettings) -> Result<Vec<Document>, CorpusError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let text_idx = column_index(&headers, &settings.text_column)?;
    let label_idx = column_index(&headers, &settings.label_column)?;

    let mut documents = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        let raw_label = record.get(label_idx).unwrap_or("").trim();
        let label = raw_label
            .parse::<i64>()
            .ok()
            .and_then(Label::from_value)
            .ok_or_else(|| CorpusError::InvalidLabel {
                line,
                value: raw_label.to_string(),
            })?;
        let text = record.get(text_idx).unwrap_or("");
        documents.push(Document::new(text, label));
    }
    Ok(documents)
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize, CorpusError> {
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| CorpusError::MissingColumn {
            column: column.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "id,label,tweet\n\
1,0,\"@user when a father is dysfunctional, so selfish\"\n\
2,1,@user #cnn calls #michigan middle school 'build the wall' chant #tcot\n\
3,0,\n";

    #[test]
    fn reads_text_and_labels_by_column_name() {
        let docs = read_csv(SAMPLE.as_bytes(), &CorpusSettings::default()).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].label, Label::Neutral);
        assert_eq!(docs[0].text, "@user when a father is dysfunctional, so selfish");
        assert_eq!(docs[1].label, Label::Offensive);
        assert_eq!(docs[2].text, "");
    }

    #[test]
    fn honors_custom_column_names() {
        let csv = "sentiment,body\n1,awful awful day\n";
        let settings = CorpusSettings {
            text_column: "body".to_string(),
            label_column: "sentiment".to_string(),
        };
        let docs = read_csv(csv.as_bytes(), &settings).unwrap();
        assert_eq!(docs, vec![Document::new("awful awful day", Label::Offensive)]);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_csv("id,text\n1,hello\n".as_bytes(), &CorpusSettings::default()).unwrap_err();
        assert!(matches!(err, CorpusError::MissingColumn { column } if column == "tweet"));
    }

    #[test]
    fn non_binary_label_is_reported_with_line() {
        let err = read_csv(
            "label,tweet\n0,fine\n2,broken\n".as_bytes(),
            &CorpusSettings::default(),
        )
        .unwrap_err();
        match err {
            CorpusError::InvalidLabel { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "2");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn loads_from_file_and_reports_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_csv(&path, &CorpusSettings::default()).unwrap().len(), 3);
        let missing = load_csv(&dir.path().join("nope.csv"), &CorpusSettings::default());
        assert!(matches!(missing, Err(CorpusError::Open { .. })));
    }
}
