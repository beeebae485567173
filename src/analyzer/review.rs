//! The review analyzer.
//!
//! Reviews arrive as `<score> <text>` lines. Every word of a review is folded
//! into the lexicon with the review's score: new words are stored with that
//! score, known words update their running mean. The analyzer keeps one
//! ranking tree ordered by score and one ordered by frequency, both updated
//! incrementally as words are inserted, rescored and removed.
//!
//! # Examples
//!
//! ```
//! use sentilex::analyzer::{ReviewAnalyzer, Sentiment};
//! use sentilex::config::AnalyzerConfig;
//!
//! let mut analyzer = ReviewAnalyzer::new(AnalyzerConfig::default()).unwrap();
//! analyzer
//!     .load_reviews("4 A brilliant film\n0 A dull film\n".as_bytes())
//!     .unwrap();
//!
//! let stats = analyzer.lookup("film").unwrap();
//! assert_eq!(stats.frequency, 2);
//! assert_eq!(stats.score, 2.0);
//!
//! let verdict = analyzer.analyze("brilliant").unwrap().unwrap();
//! assert_eq!(verdict.sentiment, Sentiment::Excellent);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analyzer::sentiment::Sentiment;
use crate::config::AnalyzerConfig;
use crate::error::{Result, SentilexError};
use crate::prefix::trie::Trie;
use crate::ranking::key::RankBy;
use crate::ranking::tree::{Ranked, RankingTree};
use crate::store::hash_index::HashIndex;
use crate::store::record::{Record, RecordId, is_valid_score};

/// A review line: a score, then the review text.
const REVIEW_LINE_PATTERN: &str = r"^\s*(?P<score>[+-]?\d+(?:\.\d+)?)(?:\s+(?P<text>.*?))?\s*$";

/// Everything the lexicon knows about one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordStats {
    pub word: String,
    pub score: f64,
    pub frequency: u32,
    pub sentiment: Sentiment,
    /// Indices of the reviews the word appeared in, first-seen order.
    pub reviews: Vec<u32>,
}

impl WordStats {
    fn from_record(record: &Record) -> Self {
        WordStats {
            word: record.word().to_string(),
            score: record.score(),
            frequency: record.frequency(),
            sentiment: Sentiment::from_score(record.score()),
            reviews: record.source_indices().to_vec(),
        }
    }
}

/// One row of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedWord {
    pub word: String,
    pub score: f64,
    pub frequency: u32,
}

/// The score of an ad-hoc review text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewScore {
    /// Mean score of every known word occurrence.
    pub score: f64,
    pub sentiment: Sentiment,
    /// Word occurrences found in the lexicon.
    pub matched: usize,
    /// Word occurrences after analysis.
    pub total: usize,
}

/// Outcome of loading a batch of review lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Reviews ingested.
    pub reviews: usize,
    /// Word occurrences folded into the lexicon.
    pub words: usize,
    /// Malformed lines that were skipped.
    pub skipped: usize,
}

/// Size and shape figures for the lexicon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerStats {
    pub words: usize,
    pub reviews: usize,
    pub capacity: usize,
    pub load_factor: f64,
    pub max_load_factor: f64,
    pub collisions: usize,
    pub growths: usize,
    pub score_tree_height: usize,
    pub frequency_tree_height: usize,
}

/// Word lexicon built from scored reviews.
#[derive(Debug)]
pub struct ReviewAnalyzer {
    config: AnalyzerConfig,
    analyzer: PipelineAnalyzer,
    line_pattern: Regex,
    index: HashIndex,
    scores: RankingTree,
    frequencies: RankingTree,
    prefixes: Trie,
    reviews: usize,
}

impl ReviewAnalyzer {
    /// Create an empty analyzer.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;

        let line_pattern = Regex::new(REVIEW_LINE_PATTERN)
            .map_err(|e| SentilexError::other(format!("Invalid review line pattern: {e}")))?;
        let index = HashIndex::with_max_load(config.initial_capacity, config.max_load_ratio)?;

        Ok(ReviewAnalyzer {
            analyzer: PipelineAnalyzer::from_config(&config.analysis),
            line_pattern,
            index,
            scores: RankingTree::new(RankBy::Score),
            frequencies: RankingTree::new(RankBy::Frequency),
            prefixes: Trie::new(),
            reviews: 0,
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Fold every word of one review into the lexicon.
    ///
    /// Returns the number of word occurrences ingested. A score outside
    /// `[0, 4]` rejects the whole review.
    pub fn ingest(&mut self, review_index: u32, score: f64, text: &str) -> Result<usize> {
        if !is_valid_score(score) {
            return Err(SentilexError::validation(format!(
                "review score {score} is outside [0, 4]"
            )));
        }

        let words = self.analyzer.words(text)?;
        for word in &words {
            let id = self.observe(word, score)?;
            if let Some(record) = self.index.record_mut(id) {
                record.add_index(review_index);
            }
        }

        self.reviews += 1;
        Ok(words.len())
    }

    /// Read `<score> <text>` lines from `reader`.
    ///
    /// Blank lines are ignored. Lines that are not valid UTF-8, lack a
    /// leading number or carry a score outside `[0, 4]` are skipped and
    /// counted.
    pub fn load_reviews<R: BufRead>(&mut self, mut reader: R) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();
        let mut buffer = Vec::new();
        let mut line_number = 0;

        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;

            let Ok(line) = std::str::from_utf8(&buffer) else {
                warn!("Skipping review on line {line_number}: not valid UTF-8");
                summary.skipped += 1;
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }

            let Some((score, text)) = self.parse_line(line) else {
                warn!("Skipping malformed review on line {line_number}");
                summary.skipped += 1;
                continue;
            };

            let review_index = u32::try_from(self.reviews)
                .map_err(|_| SentilexError::capacity("too many reviews to index"))?;
            match self.ingest(review_index, score, &text) {
                Ok(words) => {
                    summary.reviews += 1;
                    summary.words += words;
                }
                Err(SentilexError::Validation(message)) => {
                    warn!("Skipping review on line {line_number}: {message}");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Loaded {} reviews ({} words, {} skipped); lexicon holds {} words",
            summary.reviews,
            summary.words,
            summary.skipped,
            self.index.len()
        );
        Ok(summary)
    }

    /// Load reviews from a file.
    ///
    /// A path without an extension gets `.txt` appended.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadSummary> {
        let path = review_file_path(path.as_ref());
        info!("Reading reviews from {}", path.display());

        let file = File::open(&path)?;
        self.load_reviews(BufReader::new(file))
    }

    /// Fold a single word occurrence with `score` into the lexicon.
    ///
    /// Returns `true` if the word was new.
    pub fn insert_word(&mut self, word: &str, score: f64) -> Result<bool> {
        let known = self.index.search(word).is_some();
        self.observe(word, score)?;
        Ok(!known)
    }

    /// Fold `score` into the running mean of a stored word.
    ///
    /// `word` is case folded like [`lookup`](Self::lookup). Returns `false`
    /// if the word is not stored or its frequency is saturated.
    pub fn update_score(&mut self, word: &str, score: f64) -> Result<bool> {
        if !is_valid_score(score) {
            return Err(SentilexError::validation(format!(
                "score {score} for '{word}' is outside [0, 4]"
            )));
        }

        let word = self.fold_case(word);
        let Some(id) = self.index.search(&word).and_then(|key| self.index.record_id(key)) else {
            return Ok(false);
        };
        self.update_record(id, |record| record.recalculate_score(score))
    }

    /// Remove a word from the lexicon and from both rankings.
    ///
    /// `word` is case folded like [`lookup`](Self::lookup).
    /// The prefix trie is insert-only; prefix queries skip removed words.
    pub fn remove_word(&mut self, word: &str) -> bool {
        let word = self.fold_case(word);
        let Some(id) = self.index.search(&word).and_then(|key| self.index.record_id(key)) else {
            return false;
        };

        if let Some(record) = self.index.record(id) {
            self.scores.remove(id, record);
            self.frequencies.remove(id, record);
        }
        self.index.remove(&word).is_some()
    }

    /// Statistics for `word`, after case folding when lowercasing is on.
    pub fn lookup(&self, word: &str) -> Option<WordStats> {
        let word = self.fold_case(word);
        let key = self.index.search(&word)?;
        self.index.get(key).map(WordStats::from_record)
    }

    /// Score `text` by the mean score of the words the lexicon knows.
    ///
    /// Every occurrence counts, so a repeated word weighs more. Returns
    /// `None` when no word of `text` is stored.
    pub fn analyze(&self, text: &str) -> Result<Option<ReviewScore>> {
        let words = self.analyzer.words(text)?;

        let (sum, matched) = words
            .iter()
            .filter_map(|word| self.index.search(word).and_then(|key| self.index.get(key)))
            .fold((0.0, 0usize), |(sum, matched), record| (sum + record.score(), matched + 1));

        if matched == 0 {
            debug!("No known words in {} analyzed tokens", words.len());
            return Ok(None);
        }

        let score = sum / matched as f64;
        Ok(Some(ReviewScore {
            score,
            sentiment: Sentiment::from_score(score),
            matched,
            total: words.len(),
        }))
    }

    /// The `n` words with the highest mean score.
    pub fn most_positive(&self, n: usize) -> Vec<RankedWord> {
        self.resolve(self.scores.rank_greatest(n))
    }

    /// The `n` words with the lowest mean score.
    pub fn most_negative(&self, n: usize) -> Vec<RankedWord> {
        self.resolve(self.scores.rank_lowest(n))
    }

    /// The `n` most frequent words.
    pub fn most_frequent(&self, n: usize) -> Vec<RankedWord> {
        self.resolve(self.frequencies.rank_greatest(n))
    }

    /// The `n` least frequent words.
    pub fn least_frequent(&self, n: usize) -> Vec<RankedWord> {
        self.resolve(self.frequencies.rank_lowest(n))
    }

    /// Stored words starting with `prefix`, in trie order.
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.prefixes
            .search_prefix(&self.fold_case(prefix))
            .into_iter()
            .filter(|word| self.index.search(word).is_some())
            .collect()
    }

    pub fn stats(&self) -> AnalyzerStats {
        AnalyzerStats {
            words: self.index.len(),
            reviews: self.reviews,
            capacity: self.index.capacity(),
            load_factor: self.index.load_factor(),
            max_load_factor: self.index.max_load_factor(),
            collisions: self.index.collisions(),
            growths: self.index.growths(),
            score_tree_height: self.scores.height(),
            frequency_tree_height: self.frequencies.height(),
        }
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether both rankings hold exactly the stored records, balanced and
    /// in order.
    pub fn is_consistent(&self) -> bool {
        let n = self.index.len();
        self.scores.len() == n
            && self.frequencies.len() == n
            && self.scores.is_balanced()
            && self.frequencies.is_balanced()
            && self.scores.is_ordered()
            && self.frequencies.is_ordered()
            && self
                .index
                .iter()
                .all(|(id, record)| self.scores.search(id, record) && self.frequencies.search(id, record))
    }

    fn observe(&mut self, word: &str, score: f64) -> Result<RecordId> {
        let (inserted, key) = self.index.insert(word, score)?;
        let id = self
            .index
            .record_id(key)
            .ok_or_else(|| SentilexError::other(format!("no record behind '{word}'")))?;

        if inserted {
            let record = self
                .index
                .record(id)
                .ok_or_else(|| SentilexError::other(format!("record {id} is empty")))?;
            self.scores.insert(id, record);
            self.frequencies.insert(id, record);
            self.prefixes.insert(word);
        } else {
            self.update_record(id, |record| record.recalculate_score(score))?;
        }

        Ok(id)
    }

    /// Apply a key-changing mutation: unrank, mutate, rerank.
    fn update_record<F>(&mut self, id: RecordId, mutate: F) -> Result<bool>
    where
        F: FnOnce(&mut Record) -> bool,
    {
        let record = self
            .index
            .record(id)
            .ok_or_else(|| SentilexError::other(format!("record {id} is empty")))?;
        self.scores.remove(id, record);
        self.frequencies.remove(id, record);

        let record = self
            .index
            .record_mut(id)
            .ok_or_else(|| SentilexError::other(format!("record {id} is empty")))?;
        let changed = mutate(&mut *record);

        let record: &Record = record;
        self.scores.insert(id, record);
        self.frequencies.insert(id, record);
        Ok(changed)
    }

    fn resolve(&self, ranked: Vec<Ranked>) -> Vec<RankedWord> {
        ranked
            .into_iter()
            .filter_map(|entry| self.index.record(entry.record))
            .map(|record| RankedWord {
                word: record.word().to_string(),
                score: record.score(),
                frequency: record.frequency(),
            })
            .collect()
    }

    fn parse_line(&self, line: &str) -> Option<(f64, String)> {
        let captures = self.line_pattern.captures(line)?;
        let score = captures.name("score")?.as_str().parse::<f64>().ok()?;
        let text = captures.name("text").map_or("", |m| m.as_str());
        Some((score, text.to_string()))
    }

    fn fold_case(&self, word: &str) -> String {
        if self.config.analysis.lowercase {
            word.to_lowercase()
        } else {
            word.to_string()
        }
    }
}

fn review_file_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension("txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ReviewAnalyzer {
        ReviewAnalyzer::new(AnalyzerConfig::default()).unwrap()
    }

    #[test]
    fn test_ingest_running_mean() {
        let mut analyzer = analyzer();
        assert_eq!(analyzer.ingest(0, 4.0, "great plot").unwrap(), 2);
        assert_eq!(analyzer.ingest(1, 1.0, "weak plot").unwrap(), 2);
        assert_eq!(analyzer.ingest(2, 1.0, "PLOT").unwrap(), 1);

        let plot = analyzer.lookup("plot").unwrap();
        assert_eq!(plot.frequency, 3);
        assert!((plot.score - 2.0).abs() < 1e-12);
        assert_eq!(plot.reviews, vec![0, 1, 2]);
        assert_eq!(plot.sentiment, Sentiment::Ok);
        assert!(analyzer.is_consistent());
    }

    #[test]
    fn test_ingest_rejects_bad_score() {
        let mut analyzer = analyzer();
        assert!(matches!(
            analyzer.ingest(0, 4.5, "great"),
            Err(SentilexError::Validation(_))
        ));
        assert!(analyzer.is_empty());
        assert_eq!(analyzer.stats().reviews, 0);
    }

    #[test]
    fn test_repeated_word_in_one_review() {
        let mut analyzer = analyzer();
        analyzer.ingest(0, 3.0, "fun fun fun").unwrap();

        let fun = analyzer.lookup("fun").unwrap();
        assert_eq!(fun.frequency, 3);
        assert_eq!(fun.score, 3.0);
        assert_eq!(fun.reviews, vec![0]);
    }

    #[test]
    fn test_load_reviews_skips_malformed() {
        let mut analyzer = analyzer();
        let input = "1 A series of escapades .\n\nno score here\n9 out of range\n3.5 a fine film\n4\n";

        let summary = analyzer.load_reviews(input.as_bytes()).unwrap();
        assert_eq!(summary.reviews, 3);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.words, 7);

        assert_eq!(analyzer.lookup("a").unwrap().frequency, 2);
        assert_eq!(analyzer.lookup("a").unwrap().reviews, vec![0, 1]);
        assert!(analyzer.lookup(".").is_none());
        assert_eq!(analyzer.stats().reviews, 3);
    }

    #[test]
    fn test_load_reviews_skips_invalid_utf8() {
        let mut analyzer = analyzer();
        let input: &[u8] = b"4 good film\n3 caf\xe9 scene\n0 awful plot\r\n";

        let summary = analyzer.load_reviews(input).unwrap();
        assert_eq!(summary.reviews, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.words, 4);

        assert!(analyzer.lookup("scene").is_none());
        assert_eq!(analyzer.lookup("plot").unwrap().score, 0.0);
        assert_eq!(analyzer.lookup("awful").unwrap().reviews, vec![1]);
        assert_eq!(analyzer.stats().reviews, 2);
        assert!(analyzer.is_consistent());
    }

    #[test]
    fn test_update_and_remove_fold_case() {
        let mut analyzer = analyzer();
        analyzer.ingest(0, 4.0, "Bold").unwrap();
        assert_eq!(analyzer.lookup("Bold").unwrap().word, "bold");

        assert!(analyzer.update_score("BOLD", 2.0).unwrap());
        let bold = analyzer.lookup("bold").unwrap();
        assert_eq!(bold.frequency, 2);
        assert_eq!(bold.score, 3.0);

        assert!(analyzer.remove_word("Bold"));
        assert!(analyzer.lookup("bold").is_none());
        assert!(analyzer.is_consistent());
    }

    #[test]
    fn test_case_kept_without_lowercasing() {
        let mut config = AnalyzerConfig::default();
        config.analysis.lowercase = false;
        let mut analyzer = ReviewAnalyzer::new(config).unwrap();
        analyzer.ingest(0, 4.0, "Bold").unwrap();

        assert!(!analyzer.remove_word("bold"));
        assert!(!analyzer.update_score("bold", 1.0).unwrap());
        assert!(analyzer.remove_word("Bold"));
    }

    #[test]
    fn test_update_score_keeps_rankings_in_sync() {
        let mut analyzer = analyzer();
        analyzer.insert_word("solid", 2.0).unwrap();
        analyzer.insert_word("mess", 1.0).unwrap();

        assert!(analyzer.update_score("mess", 4.0).unwrap());
        assert!(analyzer.update_score("mess", 4.0).unwrap());
        assert!(!analyzer.update_score("absent", 2.0).unwrap());
        assert!(analyzer.update_score("mess", -1.0).is_err());

        assert_eq!(analyzer.most_positive(1)[0].word, "mess");
        assert_eq!(analyzer.most_frequent(1)[0].word, "mess");
        assert_eq!(analyzer.most_frequent(1)[0].frequency, 3);
        assert!(analyzer.is_consistent());
    }

    #[test]
    fn test_insert_word_reports_new() {
        let mut analyzer = analyzer();
        assert!(analyzer.insert_word("cast", 3.0).unwrap());
        assert!(!analyzer.insert_word("cast", 1.0).unwrap());
        assert_eq!(analyzer.lookup("cast").unwrap().score, 2.0);
        assert!(analyzer.insert_word("", 1.0).is_err());
    }

    #[test]
    fn test_remove_word() {
        let mut analyzer = analyzer();
        analyzer.ingest(0, 4.0, "bright bold brave").unwrap();

        assert!(analyzer.remove_word("bold"));
        assert!(!analyzer.remove_word("bold"));
        assert!(analyzer.lookup("bold").is_none());
        assert_eq!(analyzer.len(), 2);
        assert!(analyzer.most_positive(10).iter().all(|w| w.word != "bold"));
        assert_eq!(analyzer.words_with_prefix("b"), vec!["bright", "brave"]);
        assert!(analyzer.is_consistent());

        analyzer.ingest(1, 0.0, "bold").unwrap();
        assert_eq!(analyzer.lookup("bold").unwrap().frequency, 1);
        assert_eq!(analyzer.words_with_prefix("bo"), vec!["bold"]);
    }

    #[test]
    fn test_analyze() {
        let mut analyzer = analyzer();
        analyzer.ingest(0, 4.0, "wonderful").unwrap();
        analyzer.ingest(1, 0.0, "boring").unwrap();

        let score = analyzer.analyze("Wonderful wonderful but boring").unwrap().unwrap();
        assert_eq!(score.matched, 3);
        assert_eq!(score.total, 4);
        assert!((score.score - 8.0 / 3.0).abs() < 1e-12);
        assert_eq!(score.sentiment, Sentiment::Ok);

        assert!(analyzer.analyze("unknown words only").unwrap().is_none());
        assert!(analyzer.analyze("").unwrap().is_none());
    }

    #[test]
    fn test_rankings() {
        let mut analyzer = analyzer();
        analyzer
            .load_reviews("4 superb\n3 good good\n1 weak\n0 awful awful awful\n".as_bytes())
            .unwrap();

        let positive: Vec<String> = analyzer.most_positive(2).into_iter().map(|w| w.word).collect();
        assert_eq!(positive, vec!["superb", "good"]);

        let negative: Vec<String> = analyzer.most_negative(2).into_iter().map(|w| w.word).collect();
        assert_eq!(negative, vec!["awful", "weak"]);

        let frequent: Vec<String> = analyzer.most_frequent(2).into_iter().map(|w| w.word).collect();
        assert_eq!(frequent, vec!["awful", "good"]);

        assert_eq!(analyzer.least_frequent(10).len(), 4);
        assert!(analyzer.most_positive(0).is_empty());
    }

    #[test]
    fn test_growth_through_analyzer() {
        let config = AnalyzerConfig::default().with_capacity(3);
        let mut analyzer = ReviewAnalyzer::new(config).unwrap();

        for (i, word) in ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"].iter().enumerate() {
            analyzer.ingest(i as u32, (i % 5) as f64, word).unwrap();
        }

        let stats = analyzer.stats();
        assert!(stats.growths >= 1);
        assert!(stats.capacity > 3);
        assert!(stats.load_factor < stats.max_load_factor);
        assert_eq!(stats.words, 6);
        assert_eq!(analyzer.lookup("gamma").unwrap().score, 2.0);
        assert!(analyzer.is_consistent());
    }

    #[test]
    fn test_invalid_config() {
        let config = AnalyzerConfig {
            max_load_ratio: 2.0,
            ..AnalyzerConfig::default()
        };
        assert!(ReviewAnalyzer::new(config).is_err());
    }

    #[test]
    fn test_review_file_path() {
        assert_eq!(review_file_path(Path::new("reviews")), PathBuf::from("reviews.txt"));
        assert_eq!(review_file_path(Path::new("reviews.txt")), PathBuf::from("reviews.txt"));
        assert_eq!(review_file_path(Path::new("data/reviews.tsv")), PathBuf::from("data/reviews.tsv"));
    }
}
