//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::analyzer::review::{AnalyzerStats, LoadSummary, RankedWord, ReviewScore, WordStats};
use crate::cli::args::{OutputFormat, SentilexArgs};
use crate::error::Result;

/// Results that know how to print themselves for a person.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Which ranking a [`Ranking`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKind {
    MostPositive,
    MostNegative,
    MostFrequent,
}

impl RankingKind {
    fn title(&self) -> &'static str {
        match self {
            RankingKind::MostPositive => "Most positive words",
            RankingKind::MostNegative => "Most negative words",
            RankingKind::MostFrequent => "Most frequent words",
        }
    }
}

/// Result structure for the ranking commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ranking {
    pub kind: RankingKind,
    pub words: Vec<RankedWord>,
}

/// Result structure for scoring a review text.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub result: Option<ReviewScore>,
}

/// Result structure for a word lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub word: String,
    pub stats: Option<WordStats>,
}

/// Result structure for prefix listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct PrefixResult {
    pub prefix: String,
    pub words: Vec<String>,
}

impl HumanOutput for Ranking {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "-- {} --", self.kind.title())?;
        if self.words.is_empty() {
            writeln!(out, "Database is empty.")?;
        }
        for (rank, entry) in self.words.iter().enumerate() {
            writeln!(
                out,
                "{:>4}. {:<24} {:.2}  x{}",
                rank + 1,
                entry.word,
                entry.score,
                entry.frequency
            )?;
        }
        writeln!(out, "--  End of ranking   --")
    }
}

impl HumanOutput for AnalysisResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        match &self.result {
            Some(score) => {
                writeln!(out, "--     Score    --")?;
                writeln!(out, "{}", score.sentiment.verdict())?;
                writeln!(out, "{:.2} / 4.00 - {}", score.score, score.sentiment)?;
                writeln!(out, "({} of {} words known)", score.matched, score.total)?;
                writeln!(out, "-- End of score --")
            }
            None => {
                writeln!(out, "--    Result     --")?;
                writeln!(
                    out,
                    "Oops, our database lacks enough information to calculate your review's score."
                )?;
                writeln!(out, "-- End of result --")
            }
        }
    }
}

impl HumanOutput for LookupResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        match &self.stats {
            Some(stats) => {
                writeln!(out, "Word:      {}", stats.word)?;
                writeln!(out, "Score:     {:.2} / 4.00 - {}", stats.score, stats.sentiment)?;
                writeln!(out, "Frequency: {}", stats.frequency)?;
                writeln!(out, "Reviews:   {}", stats.reviews.len())
            }
            None => writeln!(out, "'{}' is not in the database.", self.word),
        }
    }
}

impl HumanOutput for PrefixResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.words.is_empty() {
            return writeln!(out, "No words start with '{}'.", self.prefix);
        }
        for word in &self.words {
            writeln!(out, "{word}")?;
        }
        Ok(())
    }
}

impl HumanOutput for AnalyzerStats {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Lexicon Statistics:")?;
        writeln!(out, "  Words: {}", self.words)?;
        writeln!(out, "  Reviews: {}", self.reviews)?;
        writeln!(out, "  Capacity: {}", self.capacity)?;
        writeln!(
            out,
            "  Load factor: {:.3} (max {:.3})",
            self.load_factor, self.max_load_factor
        )?;
        writeln!(out, "  Collisions: {}", self.collisions)?;
        writeln!(out, "  Growths: {}", self.growths)?;
        writeln!(out, "  Score tree height: {}", self.score_tree_height)?;
        writeln!(out, "  Frequency tree height: {}", self.frequency_tree_height)
    }
}

impl HumanOutput for LoadSummary {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "Read {} reviews ({} words, {} lines skipped).",
            self.reviews, self.words, self.skipped
        )
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &SentilexArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &SentilexArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.verbosity() > 1 && !message.is_empty() {
        writeln!(out, "{message}")?;
        writeln!(out)?;
    }

    result.write_human(&mut out)?;
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SentilexArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Sentiment;

    fn render<T: HumanOutput>(result: &T) -> String {
        let mut buffer = Vec::new();
        result.write_human(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_ranking_human() {
        let ranking = Ranking {
            kind: RankingKind::MostFrequent,
            words: vec![RankedWord {
                word: "film".to_string(),
                score: 2.5,
                frequency: 12,
            }],
        };

        let text = render(&ranking);
        assert!(text.starts_with("-- Most frequent words --"));
        assert!(text.contains("film"));
        assert!(text.contains("2.50  x12"));
        assert!(text.ends_with("--  End of ranking   --\n"));
    }

    #[test]
    fn test_analysis_human() {
        let result = AnalysisResult {
            text: "great".to_string(),
            result: Some(ReviewScore {
                score: 3.5,
                sentiment: Sentiment::Good,
                matched: 1,
                total: 1,
            }),
        };
        let text = render(&result);
        assert!(text.contains("Recommended! Nice one!"));
        assert!(text.contains("3.50 / 4.00 - Good"));

        let empty = AnalysisResult {
            text: "zzz".to_string(),
            result: None,
        };
        assert!(render(&empty).contains("lacks enough information"));
    }

    #[test]
    fn test_ranking_json() {
        let ranking = Ranking {
            kind: RankingKind::MostPositive,
            words: Vec::new(),
        };
        let json = serde_json::to_string(&ranking).unwrap();
        assert_eq!(json, r#"{"kind":"most_positive","words":[]}"#);
    }

    #[test]
    fn test_lookup_and_prefix_human() {
        let missing = LookupResult {
            word: "zzz".to_string(),
            stats: None,
        };
        assert_eq!(render(&missing), "'zzz' is not in the database.\n");

        let prefix = PrefixResult {
            prefix: "be".to_string(),
            words: vec!["bear".to_string(), "bell".to_string()],
        };
        assert_eq!(render(&prefix), "bear\nbell\n");
    }
}
