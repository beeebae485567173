//! Analyzers turn raw review text into lexicon words.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use sentilex::analysis::analyzer::{Analyzer, PipelineAnalyzer};
//! use sentilex::analysis::token_filter::lowercase::LowercaseFilter;
//! use sentilex::analysis::token_filter::stop::StopFilter;
//! use sentilex::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
//!     .add_filter(Arc::new(LowercaseFilter::new()))
//!     .add_filter(Arc::new(StopFilter::from_words(vec!["the", "and"])));
//!
//! let words = analyzer.words("The plot AND the cast").unwrap();
//! assert_eq!(words, vec!["plot", "cast"]);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::punctuation::PunctuationFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::Tokenizer;
use crate::config::AnalysisConfig;
use crate::error::Result;

/// Trait for analyzers that convert text into a filtered token stream.
pub trait Analyzer: Send + Sync {
    /// Analyze `text` into a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &str;

    /// Collect the text of every token that was not marked as stopped.
    fn words(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .analyze(text)?
            .filter(|token| !token.is_stopped())
            .map(|token| token.text)
            .collect())
    }
}

/// A tokenizer followed by filters applied in the order they were added.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Build the pipeline described by `config`.
    ///
    /// Order: tokenizer, punctuation, lowercase, stop words. Stop words are
    /// matched after lowercasing.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let mut analyzer = PipelineAnalyzer::new(config.tokenizer.build());

        if config.filter_punctuation {
            analyzer = analyzer.add_filter(Arc::new(PunctuationFilter::new()));
        }
        if config.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        if config.remove_stop_words {
            let stop = if config.stop_words.is_empty() {
                StopFilter::new()
            } else {
                StopFilter::from_words(config.stop_words.iter().cloned())
            };
            analyzer = analyzer.add_filter(Arc::new(stop));
        }

        analyzer
    }

    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Default for PipelineAnalyzer {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }
        Ok(tokens)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters: Vec<&str> = self.filters.iter().map(|filter| filter.name()).collect();
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &filters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::TokenizerKind;

    #[test]
    fn test_default_pipeline() {
        let analyzer = PipelineAnalyzer::default();
        let names: Vec<&str> = analyzer.filters().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["punctuation", "lowercase"]);
        assert_eq!(analyzer.name(), "pipeline_whitespace");

        let words = analyzer
            .words("A series of Escapades demonstrating the adage . -- 'quoted")
            .unwrap();
        assert_eq!(
            words,
            vec!["a", "series", "of", "escapades", "demonstrating", "the", "adage"]
        );
    }

    #[test]
    fn test_pipeline_with_stop_words() {
        let config = AnalysisConfig {
            tokenizer: TokenizerKind::UnicodeWord,
            remove_stop_words: true,
            ..AnalysisConfig::default()
        };
        let analyzer = PipelineAnalyzer::from_config(&config);

        let words = analyzer.words("The Movie was, and is, GREAT!").unwrap();
        assert_eq!(words, vec!["movie", "great"]);
    }

    #[test]
    fn test_custom_stop_words() {
        let config = AnalysisConfig {
            remove_stop_words: true,
            stop_words: vec!["movie".to_string()],
            ..AnalysisConfig::default()
        };
        let analyzer = PipelineAnalyzer::from_config(&config).with_name("reviews");

        assert_eq!(analyzer.words("the movie").unwrap(), vec!["the"]);
        assert_eq!(analyzer.name(), "reviews");
    }

    #[test]
    fn test_case_preserved_without_lowercase() {
        let config = AnalysisConfig {
            lowercase: false,
            filter_punctuation: false,
            ..AnalysisConfig::default()
        };
        let analyzer = PipelineAnalyzer::from_config(&config);
        assert_eq!(analyzer.words("Good , film").unwrap(), vec!["Good", ",", "film"]);
    }

    #[test]
    fn test_debug_lists_filters() {
        let debug = format!("{:?}", PipelineAnalyzer::default());
        assert!(debug.contains("punctuation"));
        assert!(debug.contains("whitespace"));
    }
}
