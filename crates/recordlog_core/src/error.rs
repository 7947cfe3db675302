//! Error types for record log operations.

use recordlog_codec::CodecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for record log operations.
pub type LogResult<T> = Result<T, LogError>;

/// Errors that can occur while operating on a record log.
///
/// End-of-stream is not an error: [`crate::RecordLog::read`] returns
/// `Ok(None)`. Torn trailing frames never surface either; they are healed or
/// reported as end-of-stream.
#[derive(Debug, Error)]
pub enum LogError {
    /// I/O error from the underlying file, passed through unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A length prefix that no writer could have produced.
    #[error("malformed data at offset {offset}: {source}")]
    MalformedData {
        /// Byte offset of the offending frame.
        offset: u64,
        /// What was wrong with the prefix.
        source: CodecError,
    },

    /// Seek target is negative or past the last record.
    #[error("invalid seek: {message}")]
    InvalidSeek {
        /// Description of the rejected target.
        message: String,
    },

    /// The handle has already been closed.
    #[error("record log is closed")]
    AlreadyClosed,

    /// Another write handle holds the lock on this path.
    #[error("record log locked: {} is open for writing elsewhere", path.display())]
    LockUnavailable {
        /// Path of the locked log file.
        path: PathBuf,
    },

    /// The upstream payload source failed during ingest.
    #[error("payload source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LogError {
    /// Creates an invalid seek error.
    pub fn invalid_seek(message: impl Into<String>) -> Self {
        Self::InvalidSeek {
            message: message.into(),
        }
    }

    /// Creates a malformed data error for the frame at `offset`.
    pub fn malformed(offset: u64, source: CodecError) -> Self {
        Self::MalformedData { offset, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn malformed_keeps_codec_source() {
        let err = LogError::malformed(42, CodecError::NegativeLength(-3));
        assert_eq!(
            err.to_string(),
            "malformed data at offset 42: negative record length: -3"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn lock_message_names_path() {
        let err = LogError::LockUnavailable {
            path: PathBuf::from("/tmp/blocks.log"),
        };
        assert!(err.to_string().contains("/tmp/blocks.log"));
    }
}
