//! Analyzer configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it
//! overrides:
//!
//! ```
//! use sentilex::config::AnalyzerConfig;
//!
//! let config: AnalyzerConfig =
//!     serde_json::from_str(r#"{ "initial_capacity": 101 }"#).unwrap();
//! assert_eq!(config.initial_capacity, 101);
//! assert_eq!(config.max_load_ratio, 0.7);
//! assert!(config.validate().is_ok());
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::TokenizerKind;
use crate::error::{Result, SentilexError};
use crate::store::hash_index::{DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_RATIO};

/// Settings for a [`ReviewAnalyzer`](crate::analyzer::review::ReviewAnalyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Initial hash index capacity. Rounded up to a prime.
    #[serde(default = "default_capacity")]
    pub initial_capacity: usize,

    /// Load factor above which the hash index grows, in `(0, 1]`.
    #[serde(default = "default_max_load_ratio")]
    pub max_load_ratio: f64,

    /// Text analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_max_load_ratio() -> f64 {
    DEFAULT_MAX_LOAD_RATIO
}

fn default_true() -> bool {
    true
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_ratio: DEFAULT_MAX_LOAD_RATIO,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalyzerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: AnalyzerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the initial capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Check the configuration for values the analyzer cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(SentilexError::validation(
                "initial_capacity must be greater than zero",
            ));
        }

        if !(self.max_load_ratio > 0.0 && self.max_load_ratio <= 1.0) {
            return Err(SentilexError::validation(format!(
                "max_load_ratio must be in (0, 1], got {}",
                self.max_load_ratio
            )));
        }

        if self.analysis.stop_words.iter().any(|w| w.trim().is_empty()) {
            return Err(SentilexError::validation("stop words cannot be blank"));
        }

        Ok(())
    }
}

/// How review text is split into words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub tokenizer: TokenizerKind,

    /// Drop tokens whose first character is a punctuation mark.
    #[serde(default = "default_true")]
    pub filter_punctuation: bool,

    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Remove stop words before they reach the lexicon.
    #[serde(default)]
    pub remove_stop_words: bool,

    /// Custom stop words. When empty, the built-in English list is used.
    #[serde(default)]
    pub stop_words: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerKind::default(),
            filter_punctuation: true,
            lowercase: true,
            remove_stop_words: false,
            stop_words: Vec::new(),
        }
    }
}
