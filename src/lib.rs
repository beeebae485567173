//! # Sentilex
//!
//! A word-level sentiment lexicon learned from scored reviews.
//!
//! ## Features
//!
//! - Open-addressing hash index with double hashing and automatic growth
//! - AVL ranking trees for top-K and bottom-K queries by score or frequency
//! - Prefix lookup over the vocabulary
//! - Configurable text analysis pipeline
//!
//! ## Example
//!
//! ```
//! use sentilex::prelude::*;
//!
//! let mut analyzer = ReviewAnalyzer::new(AnalyzerConfig::default()).unwrap();
//! analyzer.ingest(0, 4.0, "A gripping thriller").unwrap();
//! analyzer.ingest(1, 1.0, "A limp thriller").unwrap();
//!
//! let top = analyzer.most_positive(1);
//! assert_eq!(top[0].word, "gripping");
//! assert_eq!(analyzer.lookup("thriller").unwrap().score, 2.5);
//! ```

pub mod analysis;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod prefix;
pub mod ranking;
pub mod store;
pub mod util;

pub mod prelude {
    pub use crate::analyzer::{
        AnalyzerStats, LoadSummary, RankedWord, ReviewAnalyzer, ReviewScore, Sentiment, WordStats,
    };
    pub use crate::config::{AnalysisConfig, AnalyzerConfig};
    pub use crate::error::{Result, SentilexError};
    pub use crate::prefix::trie::Trie;
    pub use crate::ranking::key::RankBy;
    pub use crate::ranking::tree::{Ranked, RankingTree};
    pub use crate::store::hash_index::{HashIndex, SlotKey};
    pub use crate::store::record::{Record, RecordId};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
