//! Error types for the decode pipeline

use thiserror::Error;

/// Recoverable decode failures.
///
/// These never escape the top-level entry points: every call site falls
/// back to the undecoded input and keeps going, so callers always get a
/// populated-as-far-as-possible record.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Payload claimed to be base64 but was not
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Charset name with no known `encoding_rs` label
    #[error("unknown charset label: {0}")]
    UnknownCharset(String),
}

/// Result type for internal decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;
