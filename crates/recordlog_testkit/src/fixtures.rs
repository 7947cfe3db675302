//! Test fixtures and log helpers.
//!
//! Provides temporary log files plus helpers for writing raw bytes behind the
//! handle's back, which is how crash and corruption cases are staged.

use recordlog_codec::encode_frame;
use recordlog_core::{LogConfig, LogResult, RecordLog};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name used for fixture logs.
pub const LOG_FILE: &str = "test.log";

/// A log path inside a temporary directory that is removed on drop.
pub struct TempLog {
    path: PathBuf,
    /// Kept alive so the directory outlives every handle.
    _temp_dir: TempDir,
}

impl TempLog {
    /// Creates a fresh temporary directory; the log file does not exist yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            path: temp_dir.path().join(LOG_FILE),
            _temp_dir: temp_dir,
        }
    }

    /// Creates a temporary log whose file holds `payloads` as frames.
    pub fn with_records<P: AsRef<[u8]>>(payloads: &[P]) -> Self {
        let log = Self::new();
        log.write_raw(&frames(payloads));
        log
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a write handle.
    pub fn open(&self) -> LogResult<RecordLog> {
        RecordLog::open(&self.path)
    }

    /// Opens a write handle with `config`.
    pub fn open_with_config(&self, config: &LogConfig) -> LogResult<RecordLog> {
        RecordLog::open_with_config(&self.path, config)
    }

    /// Opens a read-only handle.
    pub fn open_read_only(&self) -> LogResult<RecordLog> {
        RecordLog::open_read_only(&self.path)
    }

    /// Opens a read-only handle with `config`.
    pub fn open_read_only_with_config(&self, config: &LogConfig) -> LogResult<RecordLog> {
        RecordLog::open_read_only_with_config(&self.path, config)
    }

    /// Appends raw bytes to the file, creating it if needed.
    pub fn write_raw(&self, bytes: &[u8]) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .expect("Failed to open log file for raw write");
        file.write_all(bytes).expect("Failed to write raw bytes");
    }

    /// Returns the whole file.
    pub fn bytes(&self) -> Vec<u8> {
        fs::read(&self.path).expect("Failed to read log file")
    }

    /// Returns the file size in bytes.
    pub fn file_len(&self) -> u64 {
        fs::metadata(&self.path)
            .expect("Failed to stat log file")
            .len()
    }
}

impl Default for TempLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes `payloads` back to back, exactly as a log file stores them.
pub fn frames<P: AsRef<[u8]>>(payloads: &[P]) -> Vec<u8> {
    payloads
        .iter()
        .flat_map(|p| encode_frame(p.as_ref()))
        .collect()
}

/// Reads every record from the start of `log`.
pub fn read_all(log: &mut RecordLog) -> LogResult<Vec<Vec<u8>>> {
    log.seek_to(0)?;
    log.records().collect()
}

/// Runs `f` against a write handle on a fresh temporary log, then closes it.
///
/// # Example
///
/// ```rust,ignore
/// use recordlog_testkit::with_temp_log;
///
/// with_temp_log(|log| {
///     log.append(b"block")?;
///     assert_eq!(log.count()?, 1);
///     Ok(())
/// });
/// ```
pub fn with_temp_log<F, R>(f: F) -> R
where
    F: FnOnce(&mut RecordLog) -> LogResult<R>,
{
    let temp = TempLog::new();
    let mut log = temp.open().expect("Failed to open temp log");
    let result = f(&mut log);
    log.close().expect("Failed to close temp log");
    result.expect("Test body failed")
}

/// Runs `f` on `log` and closes the handle even when `f` returns early.
///
/// Handy inside `proptest!` bodies, where a failed `prop_assert!` returns
/// an error before the body reaches its own `close`.
pub fn close_after<T, E, F>(mut log: RecordLog, f: F) -> Result<T, E>
where
    F: FnOnce(&mut RecordLog) -> Result<T, E>,
{
    let result = f(&mut log);
    log.close().expect("Failed to close log");
    result
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Deterministic payload for record `index`, `len` bytes long.
    pub fn payload(index: usize, len: usize) -> Vec<u8> {
        (0..len).map(|j| ((index * 131 + j * 7) % 256) as u8).collect()
    }

    /// A log with `count` records of `len` bytes each.
    pub fn populated_log(count: usize, len: usize) -> (TempLog, Vec<Vec<u8>>) {
        let payloads: Vec<_> = (0..count).map(|i| payload(i, len)).collect();
        (TempLog::with_records(&payloads), payloads)
    }
}
