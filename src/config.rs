//! Pipeline settings persisted as TOML.
//!
//! Every key is optional; missing keys fall back to defaults tuned for the
//! full Twitter sentiment corpus (`min_df = 1000`, `max_df = 0.9`, 25% test split, seed 42).

use std::path::{Path, PathBuf};

use serde::de::Error as SerdeDeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::dataset::corpus::CorpusSettings;
use crate::features::VocabularyOptions;
use crate::ml::logreg::TrainOptions;

/// Default filename used to store the pipeline configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Config directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub corpus: CorpusSettings,
    pub vectorizer: VectorizerSettings,
    pub split: SplitSettings,
    pub training: TrainingSettings,
    pub report: ReportSettings,
}

/// Document-frequency bounds of the vocabulary.
///
/// Config keys: `min_df`, `max_df`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerSettings {
    pub min_df: usize,
    pub max_df: f64,
}

impl Default for VectorizerSettings {
    fn default() -> Self {
        Self {
            min_df: 1000,
            max_df: 0.9,
        }
    }
}

impl VectorizerSettings {
    pub fn options(&self) -> VocabularyOptions {
        VocabularyOptions {
            min_df: self.min_df,
            max_df: self.max_df,
        }
    }
}

/// Config keys: `test_fraction`, `seed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            seed: 42,
        }
    }
}

/// Config keys: `c`, `max_iter`, `tolerance`, `learning_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    pub c: f64,
    pub max_iter: usize,
    pub tolerance: f64,
    pub learning_rate: f64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        let defaults = TrainOptions::default();
        Self {
            c: defaults.c,
            max_iter: defaults.max_iter,
            tolerance: defaults.tolerance,
            learning_rate: defaults.learning_rate,
        }
    }
}

impl TrainingSettings {
    pub fn options(&self) -> TrainOptions {
        TrainOptions {
            c: self.c,
            max_iter: self.max_iter,
            tolerance: self.tolerance,
            learning_rate: self.learning_rate,
        }
    }
}

/// Config keys: `top_n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub top_n: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl PipelineConfig {
    /// Replace unusable numeric values with their defaults.
    ///
    /// `max_df` and `test_fraction` are left alone so the vocabulary and split
    /// stages can report them.
    pub fn normalized(mut self) -> Self {
        let training = TrainingSettings::default();
        if !(self.training.c.is_finite() && self.training.c > 0.0) {
            self.training.c = training.c;
        }
        if !(self.training.tolerance.is_finite() && self.training.tolerance >= 0.0) {
            self.training.tolerance = training.tolerance;
        }
        if !(self.training.learning_rate.is_finite() && self.training.learning_rate > 0.0) {
            self.training.learning_rate = training.learning_rate;
        }
        if self.report.top_n == 0 {
            self.report.top_n = ReportSettings::default().top_n;
        }
        self
    }
}

/// Resolve the configuration file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load `config.toml` from the app directory, returning defaults if missing.
pub fn load_or_default() -> Result<PipelineConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(PipelineConfig::default());
    }
    load_from(&path)
}

/// Load configuration from an explicit TOML file.
pub fn load_from(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source: SerdeDeError::custom(source),
    })?;
    let config = parse(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Parse TOML text into a normalized configuration.
pub fn parse(text: &str) -> Result<PipelineConfig, toml::de::Error> {
    toml::from_str::<PipelineConfig>(text).map(PipelineConfig::normalized)
}
