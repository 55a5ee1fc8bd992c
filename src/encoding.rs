//! Turning raw bytes into UTF-8 text using chardetng and `encoding_rs`.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use simdutf8::basic::from_utf8;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Check if the given bytes are valid UTF-8 (SIMD-accelerated).
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Decode raw bytes into text ready for the decoder.
///
/// UTF-8 input is used as is, minus a leading BOM. UTF-16 is recognised by
/// its BOM; anything else is decoded with the encoding chardetng guesses
/// (Windows-125x, ISO-8859 variants, GBK, Shift_JIS, ...). Bytes that still
/// do not decode are replaced with U+FFFD.
pub fn read_text(data: &[u8]) -> String {
    match legacy_encoding(data) {
        Some(encoding) => {
            tracing::debug!(encoding = encoding.name(), "transcoding input to UTF-8");
            // `decode` also strips a BOM matching the encoding
            let (text, _, _) = encoding.decode(data);
            text.into_owned()
        }
        None => {
            let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
            String::from_utf8_lossy(data).into_owned()
        }
    }
}

/// The non-UTF-8 encoding `data` is written in, if any.
fn legacy_encoding(data: &[u8]) -> Option<&'static Encoding> {
    // chardetng doesn't handle UTF-16 BOMs well
    if data.starts_with(&[0xFF, 0xFE]) {
        return Some(UTF_16LE);
    }
    if data.starts_with(&[0xFE, 0xFF]) {
        return Some(UTF_16BE);
    }
    if is_utf8(data) {
        return None;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    Some(detector.guess(None, true)).filter(|&encoding| encoding != UTF_8)
}
