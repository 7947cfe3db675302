//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a frame header.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer ended before the varint terminated.
    ///
    /// At the tail of a log this means the writer stopped mid-frame.
    #[error("incomplete length prefix")]
    Incomplete,

    /// The varint does not fit in 64 bits.
    #[error("length prefix overflows 64 bits")]
    Overflow,

    /// The prefix decoded to a negative record length.
    #[error("negative record length: {0}")]
    NegativeLength(i64),
}

impl CodecError {
    /// Returns `true` if more input could turn this into a valid prefix.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete)
    }
}
