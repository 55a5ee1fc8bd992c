//! Decode and encode configuration.

use crate::dialect::{DELIMITERS, Dialect, NEWLINES, Newline};
use crate::error::Result;

/// Header configuration for decoding and encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Header {
    /// No header: rows are positional arrays.
    #[default]
    None,
    /// Decoding consumes the first row as field names; encoding of object
    /// rows writes the derived field names first.
    FirstRow,
    /// Explicit field names. Decoding consumes no row; encoding writes these
    /// names as the header line.
    Fields(Vec<String>),
}

impl Header {
    /// Returns true unless this is [`Header::None`].
    pub fn is_present(&self) -> bool {
        !matches!(self, Header::None)
    }

    /// Returns the explicit field names, if any.
    pub fn fields(&self) -> Option<&[String]> {
        match self {
            Header::Fields(names) => Some(names),
            _ => None,
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Header {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Header::Fields(iter.into_iter().map(Into::into).collect())
    }
}

/// Options recognised by the decoder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodeOptions {
    /// Number of data rows to discard after the header row.
    pub skip: usize,
    /// Maximum number of rows to emit. `None` for no limit.
    pub limit: Option<usize>,
    /// Newline override. Detected from the text when unset.
    pub newline: Option<Newline>,
    /// Delimiter override. Detected from the text when unset.
    pub delimiter: Option<char>,
    /// Header handling.
    pub header: Header,
    /// Cast numeric and boolean columns, deciding each column's rule from the
    /// first data row.
    pub cast: bool,
}

impl DecodeOptions {
    /// Check that any overrides form a usable dialect.
    pub fn validate(&self) -> Result<()> {
        if let Some(delimiter) = self.delimiter {
            Dialect::new(delimiter, self.newline.unwrap_or(NEWLINES[0]))?;
        }
        Ok(())
    }
}

/// Options recognised by the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    /// Field delimiter.
    pub delimiter: char,
    /// Line terminator placed between rows.
    pub newline: Newline,
    /// Number of leading rows to drop before encoding.
    pub skip: usize,
    /// Maximum number of rows to emit. `None` for no limit.
    pub limit: Option<usize>,
    /// Header line handling.
    pub header: Header,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            delimiter: DELIMITERS[0],
            newline: NEWLINES[0],
            skip: 0,
            limit: None,
            header: Header::None,
        }
    }
}

impl EncodeOptions {
    /// Check that the delimiter and newline form a usable dialect.
    pub fn validate(&self) -> Result<()> {
        Dialect::new(self.delimiter, self.newline).map(|_| ())
    }

    /// The dialect this encoder writes.
    pub fn dialect(&self) -> Dialect {
        Dialect {
            delimiter: self.delimiter,
            newline: self.newline,
        }
    }
}
