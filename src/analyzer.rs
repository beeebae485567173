//! Review analysis on top of the lexicon structures.
//!
//! [`review::ReviewAnalyzer`] owns the hash index, both ranking trees and
//! the prefix trie and keeps them in step. [`sentiment::Sentiment`] turns a
//! mean score into a label.

pub mod review;
pub mod sentiment;

pub use review::{AnalyzerStats, LoadSummary, RankedWord, ReviewAnalyzer, ReviewScore, WordStats};
pub use sentiment::Sentiment;
