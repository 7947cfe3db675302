//! # recordlog core
//!
//! An append-only log of opaque binary records in a single file.
//!
//! Records are stored back to back as `varint-zigzag(len) || payload` frames
//! with no file header. A [`RecordLog`] handle reads them sequentially or
//! seeks to any record by its zero-based index, using an in-memory index of
//! checkpoints that is rebuilt lazily on every open.
//!
//! ## Guarantees
//!
//! - Appends always land at the logical end of the log
//! - A crash mid-append leaves a torn tail that the next write handle
//!   truncates away; readers see it as end-of-stream
//! - Corrupt length prefixes are reported, never repaired
//! - Only one write handle per path at a time (advisory lock); read-only
//!   handles are unrestricted
//!
//! ## Example
//!
//! ```rust
//! use recordlog_core::{RecordLog, SeekOrigin};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut log = RecordLog::open(dir.path().join("blocks.log")).unwrap();
//! log.append(b"genesis").unwrap();
//! log.append(b"block 1").unwrap();
//! log.commit().unwrap();
//!
//! assert_eq!(log.seek(0, SeekOrigin::Start).unwrap(), 0);
//! assert_eq!(log.read().unwrap(), Some(b"genesis".to_vec()));
//! assert_eq!(log.count().unwrap(), 2);
//! log.close().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod checkpoint;
mod config;
mod cursor;
mod error;
mod ingest;
mod lock;
mod log;

pub use checkpoint::CheckpointIndex;
pub use config::{LogConfig, DEFAULT_CHECKPOINT_SPACING};
pub use cursor::Cursor;
pub use error::{LogError, LogResult};
pub use ingest::{ingest, IngestOptions, IngestStats, DEFAULT_COMMIT_EVERY};
pub use log::{Records, RecordLog, SeekOrigin};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
