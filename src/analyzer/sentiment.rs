//! Sentiment labels for mean review scores.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Five-step sentiment scale over scores in `[0, 4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Awful,
    Bad,
    Ok,
    Good,
    Excellent,
}

impl Sentiment {
    /// Classify a mean score.
    ///
    /// Thresholds sit at `x.95` so that a score printed with two decimals
    /// as `1.95` already reads as the next step.
    ///
    /// ```
    /// use sentilex::analyzer::Sentiment;
    ///
    /// assert_eq!(Sentiment::from_score(0.94), Sentiment::Awful);
    /// assert_eq!(Sentiment::from_score(2.95), Sentiment::Good);
    /// assert_eq!(Sentiment::from_score(4.0), Sentiment::Excellent);
    /// ```
    pub fn from_score(score: f64) -> Self {
        if score < 0.95 {
            Sentiment::Awful
        } else if score < 1.95 {
            Sentiment::Bad
        } else if score < 2.95 {
            Sentiment::Ok
        } else if score < 3.95 {
            Sentiment::Good
        } else {
            Sentiment::Excellent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Awful => "Awful",
            Sentiment::Bad => "Bad",
            Sentiment::Ok => "OK",
            Sentiment::Good => "Good",
            Sentiment::Excellent => "Excellent",
        }
    }

    /// One-line recommendation shown next to the label.
    pub fn verdict(&self) -> &'static str {
        match self {
            Sentiment::Awful => "You better avoid it!",
            Sentiment::Bad => "Maybe when you've got nothing better to do?",
            Sentiment::Ok => "Nothing remarkable, but not bad either.",
            Sentiment::Good => "Recommended! Nice one!",
            Sentiment::Excellent => "As perfect as it can be!",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
