//! Score and frequency rankings.
//!
//! A [`tree::RankingTree`] is an AVL tree over record keys; the
//! [`key::RankBy`] accessor decides whether it orders by score or by
//! frequency.

pub mod key;
pub mod tree;
