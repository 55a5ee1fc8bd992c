//! Splitting raw text into rows of raw fields.
//!
//! Two strategies produce the same rows for quote-free input:
//! - [`FastTokenizer`] splits on the newline and delimiter strings directly.
//! - [`SafeTokenizer`] scans character by character and understands quoting.
//!
//! [`Tokenizer`] picks between them once, up front, by checking whether the
//! quote mark appears anywhere in the text.

pub mod fast;
pub mod safe;

use std::borrow::Cow;
use std::fmt;

pub use fast::FastTokenizer;
pub use safe::{SafeTokenizer, Token};

use crate::dialect::{Dialect, QUOTE};

/// A row of raw, un-cast fields. Borrowed from the input where possible.
pub type RawRow<'a> = Vec<Cow<'a, str>>;

/// Tokenizer strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Plain splitting; only valid when the input holds no quote mark.
    Fast,
    /// Quote-aware scanning.
    Safe,
}

impl Strategy {
    /// Choose the strategy for `text`.
    pub fn for_text(text: &str) -> Self {
        if text.contains(QUOTE) {
            Strategy::Safe
        } else {
            Strategy::Fast
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Fast => write!(f, "fast"),
            Strategy::Safe => write!(f, "safe"),
        }
    }
}

/// Row iterator over either strategy.
#[derive(Debug, Clone)]
pub enum Tokenizer<'a> {
    Fast(FastTokenizer<'a>),
    Safe(SafeTokenizer<'a>),
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer, choosing the strategy from the text.
    pub fn new(text: &'a str, dialect: Dialect) -> Self {
        Self::with_strategy(text, dialect, Strategy::for_text(text))
    }

    /// Create a tokenizer with an explicit strategy.
    ///
    /// Forcing [`Strategy::Fast`] on quoted input splits inside quotes.
    pub fn with_strategy(text: &'a str, dialect: Dialect, strategy: Strategy) -> Self {
        match strategy {
            Strategy::Fast => Tokenizer::Fast(FastTokenizer::new(text, dialect)),
            Strategy::Safe => Tokenizer::Safe(SafeTokenizer::new(text, dialect)),
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Tokenizer::Fast(_) => Strategy::Fast,
            Tokenizer::Safe(_) => Strategy::Safe,
        }
    }

    /// Discard up to `n` rows without materializing their fields.
    ///
    /// Returns the number of rows actually discarded.
    pub fn skip_rows(&mut self, n: usize) -> usize {
        match self {
            Tokenizer::Fast(t) => t.skip_rows(n),
            Tokenizer::Safe(t) => t.skip_rows(n),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = RawRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Tokenizer::Fast(t) => t.next(),
            Tokenizer::Safe(t) => t.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Newline;

    fn rows(text: &str, dialect: Dialect, strategy: Strategy) -> Vec<Vec<String>> {
        Tokenizer::with_strategy(text, dialect, strategy)
            .map(|row| row.into_iter().map(Cow::into_owned).collect())
            .collect()
    }

    #[test]
    fn test_strategy_for_text() {
        assert_eq!(Strategy::for_text("a,b\nc,d"), Strategy::Fast);
        assert_eq!(Strategy::for_text("a,\"b\"\nc,d"), Strategy::Safe);
    }

    #[test]
    fn test_strategies_agree_without_quotes() {
        let dialect = Dialect::new(';', Newline::CrLf).unwrap();
        let text = "a;b;c\r\n1;2;3\r\n\r\n4;;6\r\nlast;row";

        let fast = rows(text, dialect, Strategy::Fast);
        let safe = rows(text, dialect, Strategy::Safe);

        assert_eq!(fast, safe);
        assert_eq!(fast[3], vec!["4", "", "6"]);
    }

    #[test]
    fn test_skip_rows_counts_available() {
        let dialect = Dialect::new(',', Newline::Lf).unwrap();
        let mut tokenizer = Tokenizer::new("a,b\nc,d\ne,f", dialect);

        assert_eq!(tokenizer.skip_rows(2), 2);
        assert_eq!(tokenizer.next(), Some(vec![Cow::from("e"), Cow::from("f")]));
        assert_eq!(tokenizer.skip_rows(5), 0);
    }
}
