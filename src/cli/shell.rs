//! Interactive review analysis session.
//!
//! Reads one command per line:
//!
//! ```text
//! read     <filename>  : read file and store words in database
//! analyze  <text>      : analyzes the overall emotion of <text>
//! print+   <amount>    : print <amount> most positive words in database
//! ```

use std::io::{BufRead, Write};

use log::debug;

use crate::analyzer::review::ReviewAnalyzer;
use crate::cli::output::{
    AnalysisResult, HumanOutput, LookupResult, PrefixResult, Ranking, RankingKind,
};
use crate::error::{Result, SentilexError};

const COMMANDS: &str = "\
-- Commands list --
read     <filename>  : read file and store words in database
analyze  <text>      : analyzes the overall emotion of <text>
print+   <amount>    : print <amount> most positive words in database
print-   <amount>    : print <amount> most negative words in database
printf   <amount>    : print <amount> most frequent words in database
prefix   <prefix>    : list words starting with <prefix>
lookup   <word>      : show the statistics of <word>
help                 : print list of commands
exit                 : ends program
--  End of list  --";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Read(String),
    Analyze(String),
    PrintPositive(usize),
    PrintNegative(usize),
    PrintFrequent(usize),
    Prefix(String),
    Lookup(String),
    Help,
    Exit,
    /// A blank line.
    Nothing,
}

impl ShellCommand {
    /// Parse one input line. Command names are case-insensitive.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ShellCommand::Nothing);
        }

        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_lowercase().as_str() {
            "read" => required(argument).map(ShellCommand::Read),
            "analyze" => required(argument).map(ShellCommand::Analyze),
            "prefix" => required(argument).map(ShellCommand::Prefix),
            "lookup" => required(argument).map(ShellCommand::Lookup),
            "print+" => amount(argument).map(ShellCommand::PrintPositive),
            "print-" => amount(argument).map(ShellCommand::PrintNegative),
            "printf" => amount(argument).map(ShellCommand::PrintFrequent),
            "help" => Ok(ShellCommand::Help),
            "exit" | "quit" => Ok(ShellCommand::Exit),
            _ => Err(SentilexError::parse("Invalid command.")),
        }
    }
}

fn required(argument: &str) -> Result<String> {
    if argument.is_empty() {
        return Err(SentilexError::parse("Command requires argument."));
    }
    Ok(argument.to_string())
}

/// Only plain digits are accepted, as in `print+ 10`.
fn amount(argument: &str) -> Result<usize> {
    let argument = required(argument)?;
    if !argument.chars().all(|c| c.is_ascii_digit()) {
        return Err(SentilexError::parse("Invalid argument."));
    }
    argument
        .parse()
        .map_err(|_| SentilexError::parse("Invalid argument."))
}

/// Run the session until `exit`, `quit` or end of input.
pub fn run_shell<R, W>(analyzer: &mut ReviewAnalyzer, input: R, out: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "-- REVIEWS ANALYSIS --")?;
    writeln!(out)?;
    writeln!(out, "{COMMANDS}")?;

    let mut lines = input.lines();
    loop {
        write!(out, "\n > ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line?;

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(SentilexError::Parse(message)) => {
                writeln!(out, "{message} Enter \"help\" to list commands.")?;
                continue;
            }
            Err(e) => return Err(e),
        };
        debug!("shell command: {command:?}");

        if command == ShellCommand::Exit {
            writeln!(out, "Program ended successfully.")?;
            return Ok(());
        }
        execute(analyzer, command, out)?;
    }
}

fn execute<W: Write>(analyzer: &mut ReviewAnalyzer, command: ShellCommand, out: &mut W) -> Result<()> {
    match command {
        ShellCommand::Read(file) => match analyzer.load_file(&file) {
            Ok(summary) => {
                summary.write_human(out)?;
                writeln!(out, "Success.")?;
            }
            Err(SentilexError::Io(e)) => {
                debug!("cannot read {file}: {e}");
                writeln!(out, "Couldn't open file. Wrong file path or format.")?;
            }
            Err(e) => return Err(e),
        },
        ShellCommand::Analyze(text) => {
            let result = analyzer.analyze(&text)?;
            AnalysisResult { text, result }.write_human(out)?;
        }
        ShellCommand::PrintPositive(n) => print_ranking(analyzer, RankingKind::MostPositive, n, out)?,
        ShellCommand::PrintNegative(n) => print_ranking(analyzer, RankingKind::MostNegative, n, out)?,
        ShellCommand::PrintFrequent(n) => print_ranking(analyzer, RankingKind::MostFrequent, n, out)?,
        ShellCommand::Prefix(prefix) => {
            let words = analyzer.words_with_prefix(&prefix);
            PrefixResult { prefix, words }.write_human(out)?;
        }
        ShellCommand::Lookup(word) => {
            let stats = analyzer.lookup(&word);
            LookupResult { word, stats }.write_human(out)?;
        }
        ShellCommand::Help => writeln!(out, "{COMMANDS}")?,
        ShellCommand::Exit | ShellCommand::Nothing => {}
    }
    Ok(())
}

fn print_ranking<W: Write>(
    analyzer: &ReviewAnalyzer,
    kind: RankingKind,
    n: usize,
    out: &mut W,
) -> Result<()> {
    if analyzer.is_empty() {
        writeln!(out, "Database is empty.")?;
        return Ok(());
    }

    let words = match kind {
        RankingKind::MostPositive => analyzer.most_positive(n),
        RankingKind::MostNegative => analyzer.most_negative(n),
        RankingKind::MostFrequent => analyzer.most_frequent(n),
    };
    Ranking { kind, words }.write_human(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;

    fn session(analyzer: &mut ReviewAnalyzer, input: &str) -> String {
        let mut out = Vec::new();
        run_shell(analyzer, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ShellCommand::parse("ANALYZE  a fine  film ").unwrap(),
            ShellCommand::Analyze("a fine  film".to_string())
        );
        assert_eq!(ShellCommand::parse("print+ 10").unwrap(), ShellCommand::PrintPositive(10));
        assert_eq!(ShellCommand::parse("printf\t3").unwrap(), ShellCommand::PrintFrequent(3));
        assert_eq!(ShellCommand::parse("quit").unwrap(), ShellCommand::Exit);
        assert_eq!(ShellCommand::parse("   ").unwrap(), ShellCommand::Nothing);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(ShellCommand::parse("read"), Err(SentilexError::Parse(m)) if m == "Command requires argument."));
        assert!(matches!(ShellCommand::parse("print- -3"), Err(SentilexError::Parse(m)) if m == "Invalid argument."));
        assert!(matches!(ShellCommand::parse("print- 3x"), Err(SentilexError::Parse(_))));
        assert!(matches!(ShellCommand::parse("dance"), Err(SentilexError::Parse(m)) if m == "Invalid command."));
    }

    #[test]
    fn test_session() {
        let mut analyzer = ReviewAnalyzer::new(AnalyzerConfig::default()).unwrap();
        analyzer.ingest(0, 4.0, "charming").unwrap();
        analyzer.ingest(1, 0.0, "tedious").unwrap();

        let output = session(
            &mut analyzer,
            "analyze charming\nprint- 1\nlookup Tedious\nprefix ch\nbogus\nexit\nanalyze never reached\n",
        );

        assert!(output.contains("As perfect as it can be!"));
        assert!(output.contains("-- Most negative words --"));
        assert!(output.contains("Frequency: 1"));
        assert!(output.contains("charming\n"));
        assert!(output.contains("Invalid command. Enter \"help\" to list commands."));
        assert!(output.contains("Program ended successfully."));
        assert_eq!(output.matches("-- End of score --").count(), 1);
    }

    #[test]
    fn test_empty_database_and_missing_file() {
        let mut analyzer = ReviewAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let output = session(&mut analyzer, "printf 5\nread /nonexistent/reviews\n");

        assert!(output.contains("Database is empty."));
        assert!(output.contains("Couldn't open file. Wrong file path or format."));
    }
}
