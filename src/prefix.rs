//! Prefix lookup over the indexed vocabulary.

pub mod trie;
