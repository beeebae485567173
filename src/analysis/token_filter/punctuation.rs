//! Punctuation filter implementation.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Leading characters that disqualify a token from the lexicon.
pub const DEFAULT_LEADING_MARKS: &[char] = &['.', ',', ';', ':', '"', '?', '!', '-', '\'', '\t', '\n', ' '];

/// A filter that drops tokens whose first character is a punctuation mark.
///
/// Stand-alone marks such as `"--"` or `","` and quoted fragments never
/// reach the lexicon. Trailing punctuation is left alone, so `"fun."` is
/// kept as written.
///
/// # Examples
///
/// ```
/// use sentilex::analysis::token_filter::Filter;
/// use sentilex::analysis::token_filter::punctuation::PunctuationFilter;
/// use sentilex::analysis::token::Token;
///
/// let filter = PunctuationFilter::new();
/// let tokens = vec![Token::new("--"), Token::new("fun."), Token::new("'s")];
/// let kept: Vec<_> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
///
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].text, "fun.");
/// ```
#[derive(Clone, Debug)]
pub struct PunctuationFilter {
    marks: Vec<char>,
}

impl PunctuationFilter {
    /// Create a filter with [`DEFAULT_LEADING_MARKS`].
    pub fn new() -> Self {
        Self::with_marks(DEFAULT_LEADING_MARKS.iter().copied())
    }

    /// Create a filter with a custom set of leading marks.
    pub fn with_marks<I: IntoIterator<Item = char>>(marks: I) -> Self {
        PunctuationFilter {
            marks: marks.into_iter().collect(),
        }
    }

    /// Whether `word` would pass this filter.
    pub fn accepts(&self, word: &str) -> bool {
        word.chars().next().is_some_and(|first| !self.marks.contains(&first))
    }
}

impl Default for PunctuationFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for PunctuationFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let kept: Vec<_> = tokens.filter(|token| self.accepts(&token.text)).collect();
        Ok(Box::new(kept.into_iter()))
    }

    fn name(&self) -> &'static str {
        "punctuation"
    }
}
