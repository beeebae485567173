//! Tokenizer implementations for text analysis.
//!
//! - [`whitespace::WhitespaceTokenizer`] - splits on whitespace, keeping
//!   punctuation attached to words
//! - [`unicode_word::UnicodeWordTokenizer`] - uses Unicode word boundaries
//!
//! # Examples
//!
//! ```
//! use sentilex::analysis::tokenizer::Tokenizer;
//! use sentilex::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

pub mod unicode_word;
pub mod whitespace;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::error::Result;

use self::unicode_word::UnicodeWordTokenizer;
use self::whitespace::WhitespaceTokenizer;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Tokenizer selection used by configuration files and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    #[default]
    Whitespace,
    UnicodeWord,
}

impl TokenizerKind {
    /// Build the tokenizer this kind names.
    pub fn build(self) -> Arc<dyn Tokenizer> {
        match self {
            TokenizerKind::Whitespace => Arc::new(WhitespaceTokenizer::new()),
            TokenizerKind::UnicodeWord => Arc::new(UnicodeWordTokenizer::new()),
        }
    }
}
