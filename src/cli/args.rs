//! Command line argument parsing for the Sentilex CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::error::Result;

/// Sentilex - word sentiment lexicon built from scored reviews
#[derive(Parser, Debug, Clone)]
#[command(name = "sentilex")]
#[command(about = "Rank and score words learned from sentiment-scored reviews")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SentilexArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Analyzer configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "SENTILEX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Initial hash index capacity (overrides the configuration file)
    #[arg(long, global = true)]
    pub capacity: Option<usize>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SentilexArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Resolve the analyzer configuration from `--config` and `--capacity`.
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_json_file(path)?,
            None => AnalyzerConfig::default(),
        };

        if let Some(capacity) = self.capacity {
            config = config.with_capacity(capacity);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the most positive words
    Positive(RankArgs),

    /// Print the most negative words
    Negative(RankArgs),

    /// Print the most frequent words
    Frequent(RankArgs),

    /// Score a review text against the lexicon
    Analyze(AnalyzeArgs),

    /// Show the statistics of one word
    Lookup(LookupArgs),

    /// List words starting with a prefix
    Prefix(PrefixArgs),

    /// Show lexicon statistics
    Stats(StatsArgs),

    /// Start an interactive session
    Shell(ShellArgs),
}

/// Arguments for the ranking commands
#[derive(Parser, Debug, Clone)]
pub struct RankArgs {
    /// Number of words to print
    #[arg(value_name = "N")]
    pub count: usize,

    /// Review file (`.txt` is appended when the name has no extension)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for scoring a review text
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Review file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Review text to score
    #[arg(value_name = "TEXT", required = true, num_args = 1.., trailing_var_arg = true)]
    pub text: Vec<String>,
}

impl AnalyzeArgs {
    /// The review text as one string.
    pub fn text(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for looking up a word
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Review file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Word to look up
    #[arg(value_name = "WORD")]
    pub word: String,
}

/// Arguments for prefix listing
#[derive(Parser, Debug, Clone)]
pub struct PrefixArgs {
    /// Review file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Word prefix
    #[arg(value_name = "PREFIX")]
    pub prefix: String,

    /// Maximum number of words to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for showing statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Review file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the interactive session
#[derive(Parser, Debug, Clone)]
pub struct ShellArgs {
    /// Review file to read before the first prompt
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
