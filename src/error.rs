use std::io;
use thiserror::Error;

/// Error type for the loading, fixture and configuration layers.
///
/// Decoding and encoding themselves never fail; they signal "no data" with
/// `None`/`false` instead.
#[derive(Error, Debug)]
pub enum CodecError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid dialect or option configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Empty file or no data.
    #[error("Empty file or no data to process")]
    EmptyData,
}

/// Result type alias for fallible codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
