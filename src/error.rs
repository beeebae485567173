//! Error types for the Sentilex library.
//!
//! All fallible operations return [`SentilexError`] through the crate-wide
//! [`Result`] alias. Misses (a word that is not stored, a record that is not
//! ranked) are not errors: they are reported as `None` or `false`.
//!
//! # Examples
//!
//! ```
//! use sentilex::error::{Result, SentilexError};
//!
//! fn check_score(score: f64) -> Result<f64> {
//!     if !(0.0..=4.0).contains(&score) {
//!         return Err(SentilexError::validation(format!("score {score} out of range")));
//!     }
//!     Ok(score)
//! }
//!
//! assert!(check_score(2.5).is_ok());
//! assert!(check_score(7.0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Sentilex operations.
#[derive(Error, Debug)]
pub enum SentilexError {
    /// Rejected input: score outside `[0, 4]`, empty word, bad configuration.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The hash index could not be sized for growth. Fatal.
    #[error("Capacity error: {0}")]
    Capacity(String),

    /// Malformed review line or command argument.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors (reading review files, configuration, terminal)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SentilexError.
pub type Result<T> = std::result::Result<T, SentilexError>;

impl SentilexError {
    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        SentilexError::Validation(msg.into())
    }

    /// Create a new capacity error.
    pub fn capacity<S: Into<String>>(msg: S) -> Self {
        SentilexError::Capacity(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        SentilexError::Parse(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SentilexError::Other(msg.into())
    }

    /// Whether this error belongs to the fatal class.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SentilexError::Capacity(_))
    }
}
