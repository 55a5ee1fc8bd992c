//! csv-duplex: a CSV-family decoder and encoder
//!
//! Decodes delimited text into rows and encodes rows back into text. The
//! delimiter and newline are detected from a short sample when they are not
//! given, and columns can optionally be cast to numbers and booleans.
//! Detection samples roughly one character in twenty, capped at 48, so short
//! inputs fall back to `,` and `\r\n` unless told otherwise.
//!
//! # Quick Start
//!
//! ```
//! use csv_duplex::{Decoder, Encoder, Header};
//!
//! let mut decoder = Decoder::new();
//! decoder.header(Header::FirstRow);
//!
//! let rows = decoder.decode("name,age\r\nWill,32\r\n").unwrap();
//! assert_eq!(rows[0].get("name").and_then(|v| v.as_str()), Some("Will"));
//!
//! let mut encoder = Encoder::new();
//! encoder.header(Header::FirstRow);
//! assert_eq!(encoder.encode(&rows).unwrap(), "name,age\r\nWill,32");
//! ```
//!
//! # Dialects
//!
//! Detection considers the delimiters `,` `;` `\t` `|` `^` and the newlines
//! `\r\n` `\r` `\n`. On a tie the candidate listed later wins. The quote mark
//! is always `"`.
//!
//! # Streaming
//!
//! [`decode_with`] and [`encode_with`] hand each row (or line) to a closure
//! instead of collecting them:
//!
//! ```
//! use csv_duplex::{DecodeOptions, Newline, decode_with};
//!
//! let options = DecodeOptions {
//!     newline: Some(Newline::Lf),
//!     ..DecodeOptions::default()
//! };
//! let mut count = 0;
//! decode_with("a,b\nc,d\n", &options, |_| count += 1);
//! assert_eq!(count, 2);
//! ```

mod cast;
mod constructor;
mod decoder;
mod dialect;
mod encoder;
mod encoding;
mod error;
pub mod fixtures;
mod options;
mod tokenizer;
mod value;

pub use error::{CodecError, Result};
pub use value::{Record, Row, Value};

pub use decoder::{Decoder, MIN_FIELDS, decode, decode_with};
pub use dialect::{DELIMITERS, Dialect, NEWLINES, Newline, QUOTE, detect, detect_dialect};
pub use encoder::{Encoder, encode, encode_with, escape_field};
pub use options::{DecodeOptions, EncodeOptions, Header};

// Re-export for advanced usage
pub use cast::{ColumnCast, parse_number};
pub use constructor::RowConstructor;
pub use encoding::{is_utf8, read_text};
pub use tokenizer::{FastTokenizer, RawRow, SafeTokenizer, Strategy, Token, Tokenizer};
