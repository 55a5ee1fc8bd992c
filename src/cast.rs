//! Best-effort scalar casting for decoded columns.
//!
//! A column's cast rule is decided once from a sample value and then applied
//! to every value in that column, whether or not it matches.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::value::Value;

/// Decimal numeric literals: `12`, `-1.5`, `.5`, `3.`, `1e-3`.
static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?$").expect("Invalid decimal pattern")
});

/// Unsigned integer literals with a radix prefix: `0x1F`, `0o17`, `0b101`.
static RADIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0(?:[xX][0-9a-fA-F]+|[oO][0-7]+|[bB][01]+)$").expect("Invalid radix pattern")
});

/// Cast rule for a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnCast {
    /// Parse as a number; non-numbers become NaN.
    Number,
    /// `true`/`t` become `true`, anything else `false`.
    Boolean,
    /// Pass the raw string through.
    #[default]
    Text,
}

impl fmt::Display for ColumnCast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnCast::Number => write!(f, "Number"),
            ColumnCast::Boolean => write!(f, "Boolean"),
            ColumnCast::Text => write!(f, "Text"),
        }
    }
}

impl ColumnCast {
    /// Decide the rule for a column from one sample value.
    ///
    /// Numbers take precedence over booleans; boolean spellings are
    /// case-sensitive.
    pub fn detect(sample: &str) -> Self {
        if parse_number(sample).is_some() {
            ColumnCast::Number
        } else if is_boolean(sample) {
            ColumnCast::Boolean
        } else {
            ColumnCast::Text
        }
    }

    /// Apply this rule to a raw field.
    #[inline]
    pub fn apply(&self, raw: &str) -> Value {
        match self {
            ColumnCast::Number => Value::Number(parse_number(raw).unwrap_or(f64::NAN)),
            ColumnCast::Boolean => Value::Bool(matches!(raw, "true" | "t")),
            ColumnCast::Text => Value::String(raw.to_string()),
        }
    }
}

/// Exactly one of the recognised boolean spellings.
#[inline]
fn is_boolean(s: &str) -> bool {
    matches!(s, "true" | "false" | "t" | "f")
}

/// Parse a numeric literal, ignoring surrounding whitespace.
///
/// Accepts decimal literals with optional sign, fraction and exponent,
/// `0x`/`0o`/`0b` integers, and signed `Infinity`. Empty or blank text reads
/// as zero. Spellings such as `inf` or `NaN` are not numbers.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    if DECIMAL_PATTERN.is_match(s) {
        return s.parse::<f64>().ok();
    }

    if RADIX_PATTERN.is_match(s) {
        let radix = match s.as_bytes()[1].to_ascii_lowercase() {
            b'x' => 16,
            b'o' => 8,
            _ => 2,
        };
        // Accumulate in f64 so literals wider than u64 still parse.
        let value = s[2..]
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
        return Some(value);
    }

    None
}
