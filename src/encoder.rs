//! Encoding rows back into delimited text.

use std::borrow::Cow;

use crate::dialect::{Newline, QUOTE};
use crate::options::{EncodeOptions, Header};
use crate::value::{Row, Value};

/// Encoder with builder-style configuration.
///
/// # Example
///
/// ```
/// use csv_duplex::{Encoder, Row, Value};
///
/// let rows: Vec<Row> = vec![vec![Value::from(1), Value::from("3,4")].into()];
/// let text = Encoder::new().encode(&rows).unwrap();
/// assert_eq!(text, "1,\"3,4\"");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    options: EncodeOptions,
}

impl Encoder {
    /// Create an encoder with default options (`,` and `\r\n`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder from existing options.
    pub fn from_options(options: EncodeOptions) -> Self {
        Self { options }
    }

    pub fn delimiter(&mut self, delimiter: char) -> &mut Self {
        self.options.delimiter = delimiter;
        self
    }

    pub fn newline(&mut self, newline: Newline) -> &mut Self {
        self.options.newline = newline;
        self
    }

    /// Drop this many leading rows before encoding.
    pub fn skip(&mut self, skip: usize) -> &mut Self {
        self.options.skip = skip;
        self
    }

    /// Emit at most this many rows.
    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.options.limit = Some(limit);
        self
    }

    pub fn header(&mut self, header: Header) -> &mut Self {
        self.options.header = header;
        self
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encode `rows` into a single string.
    pub fn encode(&self, rows: &[Row]) -> Option<String> {
        encode(rows, &self.options)
    }

    /// Encode `rows`, handing each encoded line to `sink`.
    pub fn encode_with<F: FnMut(String)>(&self, rows: &[Row], sink: F) -> bool {
        encode_with(rows, &self.options, sink)
    }
}

/// Encode `rows` into lines joined by the configured newline.
///
/// Returns `None` when no rows remain after `skip`.
pub fn encode(rows: &[Row], options: &EncodeOptions) -> Option<String> {
    let mut lines = Vec::new();
    let found = encode_with(rows, options, |line| lines.push(line));
    found.then(|| lines.join(options.newline.as_str()))
}

/// Encode `rows`, handing each encoded line (without terminator) to `sink`.
///
/// The first remaining row decides the strategy. Array rows get a header
/// line only for [`Header::Fields`]. Object rows take their field order from
/// the first row's keys; later rows are written in that order and a missing
/// key becomes an empty cell.
///
/// Returns `false` when no rows remain after `skip`, `true` otherwise.
pub fn encode_with<F: FnMut(String)>(rows: &[Row], options: &EncodeOptions, mut sink: F) -> bool {
    let rows = rows.get(options.skip..).unwrap_or_default();
    let Some(first) = rows.first() else {
        return false;
    };

    let limit = options.limit.unwrap_or(usize::MAX).min(rows.len());
    let rows = &rows[..limit];
    let line = LineWriter::new(options);

    match first {
        Row::Array(_) => {
            if let Header::Fields(names) = &options.header {
                sink(line.header(names));
            }
            for row in rows {
                let cells: Vec<Cow<'_, Value>> = match row {
                    Row::Array(cells) => cells.iter().map(Cow::Borrowed).collect(),
                    Row::Object(record) => record.values().map(Cow::Borrowed).collect(),
                };
                sink(line.cells(&cells));
            }
        }
        Row::Object(first) => {
            let keys: Vec<&str> = first.keys().collect();
            match &options.header {
                Header::FirstRow => sink(line.header(&keys)),
                Header::Fields(names) => sink(line.header(names)),
                Header::None => {}
            }
            for row in rows {
                let cells: Vec<Cow<'_, Value>> = match row {
                    Row::Object(record) => keys
                        .iter()
                        .map(|k| record.get(k).map_or(Cow::Owned(Value::Null), Cow::Borrowed))
                        .collect(),
                    // Positional rows line up with the derived keys by index
                    Row::Array(cells) => (0..keys.len())
                        .map(|i| cells.get(i).map_or(Cow::Owned(Value::Null), Cow::Borrowed))
                        .collect(),
                };
                sink(line.cells(&cells));
            }
        }
    }

    tracing::debug!(
        rows = rows.len(),
        object = first.is_object(),
        header = options.header.is_present(),
        "encoded"
    );

    true
}

/// Joins escaped cells into one line.
struct LineWriter {
    delimiter: char,
    newline: &'static str,
}

impl LineWriter {
    fn new(options: &EncodeOptions) -> Self {
        Self {
            delimiter: options.delimiter,
            newline: options.newline.as_str(),
        }
    }

    fn header<S: AsRef<str>>(&self, names: &[S]) -> String {
        self.join(names.iter().map(|n| escape_field(n.as_ref(), self.delimiter, self.newline)))
    }

    fn cells(&self, cells: &[Cow<'_, Value>]) -> String {
        self.join(cells.iter().map(|c| escape_cell(c, self.delimiter, self.newline)))
    }

    fn join<'a>(&self, fields: impl Iterator<Item = Cow<'a, str>>) -> String {
        let mut out = String::new();
        for (i, field) in fields.enumerate() {
            if i > 0 {
                out.push(self.delimiter);
            }
            out.push_str(&field);
        }
        out
    }
}

/// Render one cell for output.
///
/// Only string cells are escaped; numbers, booleans and nulls are written as
/// rendered by [`Value`]'s `Display`.
pub fn escape_cell<'a>(value: &'a Value, delimiter: char, newline: &str) -> Cow<'a, str> {
    match value {
        Value::String(s) => escape_field(s, delimiter, newline),
        other => Cow::Owned(other.to_string()),
    }
}

/// Quote `field` if it contains the quote mark, the delimiter, the newline
/// sequence or any line break, doubling any quote marks inside.
pub fn escape_field<'a>(field: &'a str, delimiter: char, newline: &str) -> Cow<'a, str> {
    let needs_quotes = field.contains([QUOTE, delimiter, '\r', '\n']) || field.contains(newline);
    if !needs_quotes {
        return Cow::Borrowed(field);
    }

    let mut out = String::with_capacity(field.len() + 2);
    out.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
    Cow::Owned(out)
}
