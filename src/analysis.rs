//! Text analysis for review lines.
//!
//! A review is broken into tokens by a [`tokenizer::Tokenizer`], then passed
//! through a chain of [`token_filter::Filter`]s. The [`analyzer::Analyzer`]
//! pipeline ties both together and yields the words that feed the lexicon.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
