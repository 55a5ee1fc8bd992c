//! Quote-aware character scanner.

use std::borrow::Cow;

use super::RawRow;
use crate::dialect::{Dialect, QUOTE};

/// Tokens produced by [`SafeTokenizer::next_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// One unescaped field.
    Field(Cow<'a, str>),
    /// The current row is complete.
    EndOfRow,
    /// No input remains.
    EndOfInput,
}

/// Single-pass scanner over quoted/escaped delimited text.
///
/// A field that opens with a quote mark runs until a quote mark that is not
/// doubled; doubled quote marks unescape to one and the delimiter and newline
/// are inert inside. Any other field runs verbatim to the next delimiter, the
/// full newline sequence, or the end of input.
#[derive(Debug, Clone)]
pub struct SafeTokenizer<'a> {
    text: &'a str,
    pos: usize,
    delimiter: char,
    newline: &'static str,
    /// A newline was consumed after the last field.
    row_end_pending: bool,
    /// A delimiter was consumed, so another field follows even at end of input.
    field_pending: bool,
}

impl<'a> SafeTokenizer<'a> {
    pub fn new(text: &'a str, dialect: Dialect) -> Self {
        Self {
            text,
            pos: 0,
            delimiter: dialect.delimiter,
            newline: dialect.newline.as_str(),
            row_end_pending: false,
            field_pending: false,
        }
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token<'a> {
        self.advance(true)
    }

    /// Discard up to `n` rows. Returns how many were discarded.
    pub fn skip_rows(&mut self, n: usize) -> usize {
        let mut skipped = 0;
        while skipped < n {
            let mut saw_field = false;
            loop {
                match self.advance(false) {
                    Token::Field(_) => saw_field = true,
                    Token::EndOfRow => break,
                    Token::EndOfInput => return skipped + usize::from(saw_field),
                }
            }
            skipped += 1;
        }
        skipped
    }

    fn advance(&mut self, keep: bool) -> Token<'a> {
        if self.row_end_pending {
            self.row_end_pending = false;
            return Token::EndOfRow;
        }

        if self.pos >= self.text.len() {
            if self.field_pending {
                self.field_pending = false;
                return Token::Field(Cow::Borrowed(""));
            }
            return Token::EndOfInput;
        }

        let field = if self.text[self.pos..].starts_with(QUOTE) {
            self.quoted_field(keep)
        } else {
            self.unquoted_field()
        };

        self.field_pending = false;
        let rest = &self.text[self.pos..];
        if rest.starts_with(self.delimiter) {
            self.pos += self.delimiter.len_utf8();
            self.field_pending = true;
        } else if rest.starts_with(self.newline) {
            self.pos += self.newline.len();
            self.row_end_pending = true;
        }

        Token::Field(field)
    }

    /// Byte offset of the next delimiter or newline at or after `from`.
    fn field_end(&self, from: usize) -> usize {
        let rest = &self.text[from..];
        rest.char_indices()
            .find(|&(i, c)| c == self.delimiter || rest[i..].starts_with(self.newline))
            .map_or(self.text.len(), |(i, _)| from + i)
    }

    fn unquoted_field(&mut self) -> Cow<'a, str> {
        let start = self.pos;
        let end = self.field_end(start);
        self.pos = end;
        Cow::Borrowed(&self.text[start..end])
    }

    fn quoted_field(&mut self, keep: bool) -> Cow<'a, str> {
        let text = self.text;
        let start = self.pos + QUOTE.len_utf8();
        let mut segment = start;
        let mut cursor = start;
        let mut unescaped: Option<String> = None;

        let body_end = loop {
            match text[cursor..].find(QUOTE) {
                // Unterminated quote: the field takes the rest of the input
                None => {
                    self.pos = text.len();
                    break text.len();
                }
                Some(offset) => {
                    let quote = cursor + offset;
                    let after = quote + QUOTE.len_utf8();
                    if text[after..].starts_with(QUOTE) {
                        if keep {
                            unescaped
                                .get_or_insert_with(String::new)
                                .push_str(&text[segment..after]);
                        }
                        cursor = after + QUOTE.len_utf8();
                        segment = cursor;
                    } else {
                        self.pos = after;
                        break quote;
                    }
                }
            }
        };

        if !keep {
            // Still step over anything trailing the closing quote
            self.pos = self.field_end(self.pos);
            return Cow::Borrowed("");
        }

        // Text between the closing quote and the next delimiter/newline is kept verbatim
        let trailing_end = self.field_end(self.pos);
        let trailing = &text[self.pos..trailing_end];
        self.pos = trailing_end;

        match unescaped {
            None if trailing.is_empty() => Cow::Borrowed(&text[start..body_end]),
            None => Cow::Owned(format!("{}{trailing}", &text[start..body_end])),
            Some(mut buf) => {
                buf.push_str(&text[segment..body_end]);
                buf.push_str(trailing);
                Cow::Owned(buf)
            }
        }
    }
}

impl<'a> Iterator for SafeTokenizer<'a> {
    type Item = RawRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = RawRow::new();
        loop {
            match self.next_token() {
                Token::Field(field) => row.push(field),
                Token::EndOfRow => return Some(row),
                Token::EndOfInput => return (!row.is_empty()).then_some(row),
            }
        }
    }
}
