//! Key accessors for ranking trees.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::record::{Record, is_valid_score};

/// Key of a node that carries no data. Never a valid inserted key.
pub const NO_KEY: f64 = -1.0;

/// Which record field a ranking tree orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    /// Running mean sentiment score, in `[0, 4]`.
    Score,
    /// Occurrence count, promoted to `f64`.
    Frequency,
}

impl RankBy {
    /// Extract the ordering key from `record`.
    pub fn key(&self, record: &Record) -> f64 {
        match self {
            RankBy::Score => record.score(),
            RankBy::Frequency => f64::from(record.frequency()),
        }
    }

    /// Whether `key` may be stored in a tree ordered by this accessor.
    pub fn is_valid_key(&self, key: f64) -> bool {
        match self {
            RankBy::Score => is_valid_score(key),
            RankBy::Frequency => key.is_finite() && key >= 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RankBy::Score => "score",
            RankBy::Frequency => "frequency",
        }
    }
}

impl fmt::Display for RankBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
