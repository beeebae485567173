//! Command implementations for the Sentilex CLI.

use std::io;
use std::path::Path;

use log::info;

use crate::analyzer::review::ReviewAnalyzer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::cli::shell::run_shell;
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: SentilexArgs) -> Result<()> {
    match &args.command {
        Command::Positive(rank_args) => {
            show_ranking(RankingKind::MostPositive, rank_args.clone(), &args)
        }
        Command::Negative(rank_args) => {
            show_ranking(RankingKind::MostNegative, rank_args.clone(), &args)
        }
        Command::Frequent(rank_args) => {
            show_ranking(RankingKind::MostFrequent, rank_args.clone(), &args)
        }
        Command::Analyze(analyze_args) => analyze_text(analyze_args.clone(), &args),
        Command::Lookup(lookup_args) => lookup_word(lookup_args.clone(), &args),
        Command::Prefix(prefix_args) => list_prefix(prefix_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
        Command::Shell(shell_args) => start_shell(shell_args.clone(), &args),
    }
}

/// Build an analyzer from the global options and load `file` into it.
fn open_analyzer(file: &Path, cli_args: &SentilexArgs) -> Result<ReviewAnalyzer> {
    let mut analyzer = ReviewAnalyzer::new(cli_args.analyzer_config()?)?;
    let summary = analyzer.load_file(file)?;

    if cli_args.verbosity() > 1 && cli_args.output_format == OutputFormat::Human {
        summary.write_human(&mut io::stdout().lock())?;
    }
    Ok(analyzer)
}

fn show_ranking(kind: RankingKind, args: RankArgs, cli_args: &SentilexArgs) -> Result<()> {
    let analyzer = open_analyzer(&args.file, cli_args)?;

    let words = match kind {
        RankingKind::MostPositive => analyzer.most_positive(args.count),
        RankingKind::MostNegative => analyzer.most_negative(args.count),
        RankingKind::MostFrequent => analyzer.most_frequent(args.count),
    };

    output_result("Ranking complete", &Ranking { kind, words }, cli_args)
}

fn analyze_text(args: AnalyzeArgs, cli_args: &SentilexArgs) -> Result<()> {
    let analyzer = open_analyzer(&args.file, cli_args)?;
    let text = args.text();
    let result = analyzer.analyze(&text)?;

    output_result("Analysis complete", &AnalysisResult { text, result }, cli_args)
}

fn lookup_word(args: LookupArgs, cli_args: &SentilexArgs) -> Result<()> {
    let analyzer = open_analyzer(&args.file, cli_args)?;
    let stats = analyzer.lookup(&args.word);

    output_result(
        "Lookup complete",
        &LookupResult {
            word: args.word,
            stats,
        },
        cli_args,
    )
}

fn list_prefix(args: PrefixArgs, cli_args: &SentilexArgs) -> Result<()> {
    let analyzer = open_analyzer(&args.file, cli_args)?;
    let mut words = analyzer.words_with_prefix(&args.prefix);
    if let Some(limit) = args.limit {
        words.truncate(limit);
    }

    output_result(
        "Prefix search complete",
        &PrefixResult {
            prefix: args.prefix,
            words,
        },
        cli_args,
    )
}

fn show_stats(args: StatsArgs, cli_args: &SentilexArgs) -> Result<()> {
    let analyzer = open_analyzer(&args.file, cli_args)?;
    output_result("Lexicon statistics", &analyzer.stats(), cli_args)
}

fn start_shell(args: ShellArgs, cli_args: &SentilexArgs) -> Result<()> {
    let mut analyzer = match &args.file {
        Some(file) => open_analyzer(file, cli_args)?,
        None => ReviewAnalyzer::new(cli_args.analyzer_config()?)?,
    };
    info!("Starting interactive session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_shell(&mut analyzer, stdin.lock(), &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::*;

    fn review_file() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "4 a triumph").unwrap();
        writeln!(file, "0 a disaster").unwrap();
        file
    }

    #[test]
    fn test_open_analyzer() {
        let file = review_file();
        let args = SentilexArgs::parse_from(["sentilex", "-q", "stats", "unused"]);

        let analyzer = open_analyzer(file.path(), &args).unwrap();
        assert_eq!(analyzer.len(), 3);
        assert_eq!(analyzer.lookup("a").unwrap().frequency, 2);
    }

    #[test]
    fn test_execute_commands() {
        let file = review_file();
        let path = file.path().to_str().unwrap();

        for argv in [
            vec!["sentilex", "-q", "positive", "2", path],
            vec!["sentilex", "-q", "-f", "json", "frequent", "1", path],
            vec!["sentilex", "-q", "analyze", path, "a", "triumph"],
            vec!["sentilex", "-q", "lookup", path, "disaster"],
            vec!["sentilex", "-q", "prefix", path, "t", "--limit", "1"],
            vec!["sentilex", "-q", "-f", "json", "stats", path],
        ] {
            let args = SentilexArgs::parse_from(argv);
            assert!(execute_command(args).is_ok());
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let args = SentilexArgs::parse_from(["sentilex", "-q", "stats", "/nonexistent/reviews"]);
        assert!(matches!(
            execute_command(args),
            Err(crate::error::SentilexError::Io(_))
        ));
    }
}
