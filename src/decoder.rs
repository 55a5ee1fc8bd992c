//! Decoding delimited text into rows.

use std::borrow::Cow;

use crate::constructor::RowConstructor;
use crate::dialect::{Dialect, Newline};
use crate::options::{DecodeOptions, Header};
use crate::tokenizer::Tokenizer;
use crate::value::Row;

/// Rows with fewer raw fields than this are treated as blank/garbage lines
/// and dropped.
pub const MIN_FIELDS: usize = 2;

/// Decoder with builder-style configuration.
///
/// # Example
///
/// ```
/// use csv_duplex::{Decoder, Header};
///
/// let mut decoder = Decoder::new();
/// decoder.header(Header::FirstRow).cast(true);
///
/// let rows = decoder.decode("name,age\r\nWill,32\r\n").unwrap();
/// assert_eq!(rows[0].get("age").and_then(|v| v.as_f64()), Some(32.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    /// Create a decoder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder from existing options.
    pub fn from_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Discard this many data rows after the header row.
    pub fn skip(&mut self, skip: usize) -> &mut Self {
        self.options.skip = skip;
        self
    }

    /// Read at most this many rows after the header and skip.
    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.options.limit = Some(limit);
        self
    }

    /// Force a specific delimiter (skip delimiter detection).
    pub fn delimiter(&mut self, delimiter: char) -> &mut Self {
        self.options.delimiter = Some(delimiter);
        self
    }

    /// Force a specific newline (skip newline detection).
    pub fn newline(&mut self, newline: Newline) -> &mut Self {
        self.options.newline = Some(newline);
        self
    }

    /// Set header handling.
    pub fn header(&mut self, header: Header) -> &mut Self {
        self.options.header = header;
        self
    }

    /// Enable or disable type casting.
    pub fn cast(&mut self, cast: bool) -> &mut Self {
        self.options.cast = cast;
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The dialect this decoder would use for `text`.
    pub fn dialect_for(&self, text: &str) -> Dialect {
        Dialect::resolve(text, self.options.delimiter, self.options.newline)
    }

    /// Decode `text` into a collected sequence of rows.
    pub fn decode(&self, text: &str) -> Option<Vec<Row>> {
        decode(text, &self.options)
    }

    /// Decode `text`, handing each row to `sink`.
    pub fn decode_with<F: FnMut(Row)>(&self, text: &str, sink: F) -> bool {
        decode_with(text, &self.options, sink)
    }
}

/// Decode `text` into a collected sequence of rows.
///
/// Returns `None` when `text` is empty. A non-empty text without any usable
/// row yields `Some` of an empty vector.
pub fn decode(text: &str, options: &DecodeOptions) -> Option<Vec<Row>> {
    let mut rows = Vec::new();
    let found = decode_with(text, options, |row| rows.push(row));
    found.then_some(rows)
}

/// Decode `text`, handing each row to `sink` in input order.
///
/// Returns `false` when `text` is empty, `true` otherwise.
///
/// The header row (for [`Header::FirstRow`]) is taken first, then `skip` rows
/// are discarded, then at most `limit` rows are read. Rows with fewer than
/// [`MIN_FIELDS`] fields are dropped but still count toward `limit`. The row
/// constructor, and with it every column's cast rule, is fixed by the first
/// emitted row.
pub fn decode_with<F: FnMut(Row)>(text: &str, options: &DecodeOptions, mut sink: F) -> bool {
    if text.is_empty() {
        return false;
    }

    let dialect = Dialect::resolve(text, options.delimiter, options.newline);
    let mut rows = Tokenizer::new(text, dialect);

    let fields: Option<Cow<'_, [String]>> = match &options.header {
        Header::None => None,
        Header::FirstRow => Some(Cow::Owned(
            rows.next()
                .map(|row| row.into_iter().map(Cow::into_owned).collect())
                .unwrap_or_default(),
        )),
        Header::Fields(names) => Some(Cow::Borrowed(names.as_slice())),
    };

    let skipped = rows.skip_rows(options.skip);
    let limit = options.limit.unwrap_or(usize::MAX);

    tracing::debug!(
        delimiter = ?dialect.delimiter,
        newline = %dialect.newline,
        strategy = %rows.strategy(),
        header = ?fields,
        skipped,
        "decoding"
    );

    let mut constructor: Option<RowConstructor> = None;
    let mut emitted = 0usize;
    let mut dropped = 0usize;

    for raw in rows.take(limit) {
        if raw.len() < MIN_FIELDS {
            dropped += 1;
            continue;
        }

        let constructor = constructor
            .get_or_insert_with(|| RowConstructor::build(fields.as_deref(), &raw, options.cast));
        sink(constructor.construct(&raw));
        emitted += 1;
    }

    tracing::debug!(emitted, dropped, "decoded");

    true
}
