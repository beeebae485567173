//! Token types for text analysis.
//!
//! # Examples
//!
//! ```
//! use sentilex::analysis::token::Token;
//!
//! let token = Token::new("World").with_text("world");
//! assert_eq!(token.text, "world");
//! assert!(!token.is_stopped());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single unit of text produced by a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token's text content.
    pub text: String,

    /// Set by filters that mark a token as a stop word without removing it.
    pub stopped: bool,
}

impl Token {
    /// Create a new token.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token {
            text: text.into(),
            stopped: false,
        }
    }

    /// Replace the token text.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A stream of tokens flowing through the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;
