//! Dialect model and frequency-based delimiter/newline detection.

use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, Result};

/// The quote mark used for field quoting and escaping.
pub const QUOTE: char = '"';

/// Candidate delimiters, in priority order.
///
/// Detection scans this list from the end, so on equal counts the entry
/// nearest the end wins; `,` is the fallback when nothing occurs.
pub const DELIMITERS: &[char] = &[',', ';', '\t', '|', '^'];

/// Candidate newline sequences, in priority order.
pub const NEWLINES: &[Newline] = &[Newline::CrLf, Newline::Cr, Newline::Lf];

/// Upper bound on the number of characters sampled for detection.
pub const MAX_SAMPLE_CHARS: usize = 48;

/// Line terminator sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Newline {
    /// Windows-style line ending (\r\n).
    #[default]
    CrLf,
    /// Old Mac-style line ending (\r).
    Cr,
    /// Unix-style line ending (\n).
    Lf,
}

impl Newline {
    /// Returns the literal sequence for this line terminator.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Newline::CrLf => "\r\n",
            Newline::Cr => "\r",
            Newline::Lf => "\n",
        }
    }

    /// Returns the escaped representation, suitable for display.
    pub const fn escaped(&self) -> &'static str {
        match self {
            Newline::CrLf => "\\r\\n",
            Newline::Cr => "\\r",
            Newline::Lf => "\\n",
        }
    }
}

impl fmt::Display for Newline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.escaped())
    }
}

impl FromStr for Newline {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "crlf" | "\r\n" | "\\r\\n" => Ok(Newline::CrLf),
            "cr" | "\r" | "\\r" => Ok(Newline::Cr),
            "lf" | "\n" | "\\n" => Ok(Newline::Lf),
            _ => Err(CodecError::InvalidConfig(format!(
                "unknown newline '{s}' (expected crlf, cr or lf)"
            ))),
        }
    }
}

/// The (delimiter, newline) pair governing how text is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    /// Field delimiter character.
    pub delimiter: char,
    /// Line terminator sequence.
    pub newline: Newline,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: DELIMITERS[0],
            newline: NEWLINES[0],
        }
    }
}

impl Dialect {
    /// Create a dialect, rejecting delimiters that would collide with quoting
    /// or line termination.
    pub fn new(delimiter: char, newline: Newline) -> Result<Self> {
        if delimiter == QUOTE || delimiter == '\r' || delimiter == '\n' {
            return Err(CodecError::InvalidConfig(format!(
                "delimiter {delimiter:?} collides with the quote mark or a newline"
            )));
        }
        Ok(Self { delimiter, newline })
    }

    /// Fill in whichever of `delimiter`/`newline` is unset by sniffing `text`.
    ///
    /// Detection only runs when at least one of them is missing.
    pub fn resolve(text: &str, delimiter: Option<char>, newline: Option<Newline>) -> Self {
        match (delimiter, newline) {
            (Some(delimiter), Some(newline)) => Self { delimiter, newline },
            _ => {
                let detected = detect_dialect(text);
                Self {
                    delimiter: delimiter.unwrap_or(detected.delimiter),
                    newline: newline.unwrap_or(detected.newline),
                }
            }
        }
    }
}

/// Number of characters sampled from `text`: `min(48, chars / 20, chars)`.
pub fn sample_limit(text: &str) -> usize {
    let chars = bytecount::num_chars(text.as_bytes());
    MAX_SAMPLE_CHARS.min(chars / 20).min(chars)
}

/// Detect the dialect of `text` using the default candidate sets and sample size.
pub fn detect_dialect(text: &str) -> Dialect {
    detect(text, DELIMITERS, NEWLINES, sample_limit(text))
}

/// Detect the dialect of `text` from its first `sample_chars` characters.
///
/// Each candidate category is resolved independently by [`most_frequent`].
/// Empty candidate lists fall back to the [`Dialect::default`] component.
pub fn detect(
    text: &str,
    delimiters: &[char],
    newlines: &[Newline],
    sample_chars: usize,
) -> Dialect {
    let end = sample_end(text, sample_chars);
    let sample = &text[..end];

    let defaults = Dialect::default();
    let delimiter = most_frequent(delimiters, |d| frequency(sample, d))
        .unwrap_or(defaults.delimiter);
    let newline = most_frequent(newlines, |n| newline_frequency(text.as_bytes(), end, n))
        .unwrap_or(defaults.newline);

    tracing::debug!(
        sample_chars,
        delimiter = ?delimiter,
        newline = %newline,
        "detected dialect"
    );

    Dialect { delimiter, newline }
}

/// Pick the candidate with the strictly highest count.
///
/// The list is scanned from its last entry to its first and a candidate only
/// replaces the current pick on a strictly greater count, so ties go to the
/// entry nearest the end of the list. When no candidate occurs at all the
/// first entry is returned. `None` only for an empty candidate list.
pub fn most_frequent<T: Copy>(candidates: &[T], count: impl Fn(T) -> usize) -> Option<T> {
    let mut max = 0;
    let mut detected = None;

    for &candidate in candidates.iter().rev() {
        let n = count(candidate);
        if n > max {
            max = n;
            detected = Some(candidate);
        }
    }

    detected.or_else(|| candidates.first().copied())
}

/// Count occurrences of `needle` in `sample`.
pub fn frequency(sample: &str, needle: char) -> usize {
    if needle.is_ascii() {
        bytecount::count(sample.as_bytes(), needle as u8)
    } else {
        sample.matches(needle).count()
    }
}

/// Count line terminators of kind `newline` starting before byte `end`.
///
/// Terminators are counted exclusively: a `\r\n` pair never counts as a lone
/// `\r` or a lone `\n`. Lookahead past `end` is allowed so a pair split by the
/// sample boundary is still recognised.
pub fn newline_frequency(data: &[u8], end: usize, newline: Newline) -> usize {
    let end = end.min(data.len());
    let mut count = 0;
    let mut i = 0;

    while i < end {
        match data[i] {
            b'\r' if data.get(i + 1) == Some(&b'\n') => {
                if newline == Newline::CrLf {
                    count += 1;
                }
                i += 2;
                continue;
            }
            b'\r' if newline == Newline::Cr => count += 1,
            b'\n' if newline == Newline::Lf => count += 1,
            _ => {}
        }
        i += 1;
    }

    count
}

/// Byte offset just past the first `chars` characters of `text`.
fn sample_end(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_limit() {
        assert_eq!(sample_limit(""), 0);
        assert_eq!(sample_limit("1,2,3,4\r\n5,6,7,8\r\n"), 0);
        assert_eq!(sample_limit(&"a".repeat(100)), 5);
        assert_eq!(sample_limit(&"a".repeat(10_000)), MAX_SAMPLE_CHARS);
        // Counted in characters, not bytes
        assert_eq!(sample_limit(&"é".repeat(100)), 5);
    }

    #[test]
    fn test_fallback_when_nothing_found() {
        let dialect = detect("abc", DELIMITERS, NEWLINES, 3);
        assert_eq!(dialect, Dialect::default());

        // A zero-length sample sees nothing either
        let dialect = detect("a;b;c\nd;e;f\n", DELIMITERS, NEWLINES, 0);
        assert_eq!(dialect.delimiter, ',');
        assert_eq!(dialect.newline, Newline::CrLf);
    }

    #[test]
    fn test_tie_goes_to_later_candidate() {
        // One comma and one semicolon: the reverse scan sees ';' first and
        // ',' does not beat it with an equal count.
        let dialect = detect(",;", DELIMITERS, NEWLINES, 2);
        assert_eq!(dialect.delimiter, ';');

        // Reordering the candidates flips the winner.
        let dialect = detect(",;", &[';', ','], NEWLINES, 2);
        assert_eq!(dialect.delimiter, ',');
    }

    #[test]
    fn test_strictly_greater_wins() {
        let dialect = detect(",,;", DELIMITERS, NEWLINES, 3);
        assert_eq!(dialect.delimiter, ',');
    }

    #[test]
    fn test_most_frequent_empty() {
        assert_eq!(most_frequent::<char>(&[], |_| 1), None);
        assert_eq!(most_frequent(&['a', 'b'], |_| 0), Some('a'));
    }

    #[test]
    fn test_newline_frequency_exclusive() {
        let data = b"a\r\nb\r\nc\rd\n";
        assert_eq!(newline_frequency(data, data.len(), Newline::CrLf), 2);
        assert_eq!(newline_frequency(data, data.len(), Newline::Cr), 1);
        assert_eq!(newline_frequency(data, data.len(), Newline::Lf), 1);
    }

    #[test]
    fn test_detect_crlf() {
        let text = "name,age,city\r\n".repeat(40);
        let dialect = detect_dialect(&text);
        assert_eq!(dialect.newline, Newline::CrLf);
        assert_eq!(dialect.delimiter, ',');
    }

    #[test]
    fn test_detect_lf_and_tab() {
        let text = "a\tb\tc\n".repeat(30);
        let dialect = detect_dialect(&text);
        assert_eq!(dialect.newline, Newline::Lf);
        assert_eq!(dialect.delimiter, '\t');
    }

    #[test]
    fn test_semicolon_beats_quoted_commas() {
        let text = "id;\"x,y\";name\n1;\"a,b\";alice\n2;\"c,d\";bob\n".repeat(20);
        let dialect = detect_dialect(&text);
        assert_eq!(dialect.delimiter, ';');
        assert_eq!(dialect.newline, Newline::Lf);
    }

    #[test]
    fn test_resolve_keeps_overrides() {
        let text = "a;b;c\n".repeat(40);
        let dialect = Dialect::resolve(&text, Some('|'), None);
        assert_eq!(dialect.delimiter, '|');
        assert_eq!(dialect.newline, Newline::Lf);

        let dialect = Dialect::resolve(&text, None, Some(Newline::Cr));
        assert_eq!(dialect.delimiter, ';');
        assert_eq!(dialect.newline, Newline::Cr);
    }

    #[test]
    fn test_dialect_new_rejects_collisions() {
        assert!(Dialect::new('"', Newline::Lf).is_err());
        assert!(Dialect::new('\n', Newline::CrLf).is_err());
        assert!(Dialect::new(';', Newline::Lf).is_ok());
    }

    #[test]
    fn test_newline_from_str() {
        assert_eq!("CRLF".parse::<Newline>().unwrap(), Newline::CrLf);
        assert_eq!("lf".parse::<Newline>().unwrap(), Newline::Lf);
        assert_eq!("\\r".parse::<Newline>().unwrap(), Newline::Cr);
        assert!("semicolon".parse::<Newline>().is_err());
    }
}
