//! Token filters applied after tokenization.
//!
//! - [`lowercase::LowercaseFilter`] - converts tokens to lowercase
//! - [`punctuation::PunctuationFilter`] - drops tokens that open with a
//!   punctuation mark
//! - [`stop::StopFilter`] - removes stop words
//!
//! Filters are chained by an [`Analyzer`](crate::analysis::analyzer::Analyzer):
//!
//! ```text
//! Tokenizer → Punctuation → Lowercase → Stop Words → Lexicon
//! ```

pub mod lowercase;
pub mod punctuation;
pub mod stop;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}
