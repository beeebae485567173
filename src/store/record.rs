//! Per-word statistics record.
//!
//! A [`Record`] holds everything the lexicon knows about one word: the word
//! itself, its running mean sentiment score, how many times it occurred and
//! which review records it occurred in. Records live inside the
//! [`HashIndex`](crate::store::hash_index::HashIndex) arena and are referred
//! to elsewhere by [`RecordId`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest valid sentiment score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest valid sentiment score.
pub const MAX_SCORE: f64 = 4.0;

/// Check whether `score` lies in `[MIN_SCORE, MAX_SCORE]`.
///
/// NaN is never valid.
pub fn is_valid_score(score: f64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Stable identifier of a record inside the hash index arena.
///
/// Unlike slot keys, record ids survive hash index growth. An id is released
/// when its word is removed and may then be handed to a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub(crate) usize);

impl RecordId {
    /// Raw arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Statistics for a single word.
///
/// An empty `word` marks a cleared record. Once live, `frequency >= 1`.
///
/// # Examples
///
/// ```
/// use sentilex::store::record::Record;
///
/// let mut record = Record::new();
/// assert!(record.insert("great", 4.0));
/// assert!(record.recalculate_score(2.0));
///
/// assert_eq!(record.frequency(), 2);
/// assert_eq!(record.score(), 3.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    word: String,
    score: f64,
    frequency: u32,
    source_indices: Vec<u32>,
}

impl Record {
    /// Create an empty (unoccupied) record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `word` with its first score.
    ///
    /// Fails when the record already holds a word, when `word` is empty or
    /// when `score` is out of range. Callers check occupancy first.
    pub fn insert(&mut self, word: &str, score: f64) -> bool {
        if !self.word.is_empty() || word.is_empty() || !is_valid_score(score) {
            return false;
        }

        self.word = word.to_string();
        self.score = score;
        self.frequency = 1;
        true
    }

    /// Fold another occurrence with `score` into the running mean.
    ///
    /// `score = (score * frequency + new_score) / (frequency + 1)`, then the
    /// frequency is incremented. Out-of-range input, or a frequency already
    /// at `u32::MAX`, leaves the record untouched and returns `false`.
    pub fn recalculate_score(&mut self, new_score: f64) -> bool {
        if !is_valid_score(new_score) {
            return false;
        }
        let Some(frequency) = self.frequency.checked_add(1) else {
            return false;
        };

        let total = self.score * f64::from(self.frequency) + new_score;
        self.frequency = frequency;
        self.score = total / f64::from(frequency);
        true
    }

    /// Remember that the word occurred in review `index`.
    ///
    /// Returns `false` if the index was already stored.
    pub fn add_index(&mut self, index: u32) -> bool {
        if self.source_indices.contains(&index) {
            return false;
        }
        self.source_indices.push(index);
        true
    }

    /// Reset the record to the unoccupied state.
    pub fn clear(&mut self) {
        self.word.clear();
        self.score = 0.0;
        self.frequency = 0;
        self.source_indices.clear();
    }

    /// Whether the record holds no word.
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Review indices in first-seen order.
    pub fn source_indices(&self) -> &[u32] {
        &self.source_indices
    }
}
