//! Split-based tokenizer for input that contains no quote marks.

use std::borrow::Cow;
use std::str::Split;

use super::RawRow;
use crate::dialect::Dialect;

/// Splits text on the exact newline string, then each line on the delimiter.
///
/// No escaping logic runs, so this is only correct when the quote mark is
/// absent from the whole input.
#[derive(Debug, Clone)]
pub struct FastTokenizer<'a> {
    lines: Split<'a, &'static str>,
    delimiter: char,
}

impl<'a> FastTokenizer<'a> {
    pub fn new(text: &'a str, dialect: Dialect) -> Self {
        Self {
            lines: text.split(dialect.newline.as_str()),
            delimiter: dialect.delimiter,
        }
    }

    /// Discard up to `n` lines. Returns how many were discarded.
    pub fn skip_rows(&mut self, n: usize) -> usize {
        self.lines.by_ref().take(n).count()
    }
}

impl<'a> Iterator for FastTokenizer<'a> {
    type Item = RawRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(line.split(self.delimiter).map(Cow::Borrowed).collect())
    }
}
