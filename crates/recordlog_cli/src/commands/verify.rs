//! Verify command implementation.

use super::with_log;
use recordlog_core::{LogError, RecordLog};
use std::fs;
use std::path::Path;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Complete records before the first problem (or the end).
    pub records: u64,
    /// Bytes covered by those records.
    pub valid_bytes: u64,
    /// File size in bytes.
    pub file_size: u64,
    /// Description of a malformed frame, if one was found.
    pub malformed: Option<String>,
}

impl VerifyResult {
    /// Bytes after the last complete record that were not malformed.
    pub fn torn_bytes(&self) -> u64 {
        if self.malformed.is_some() {
            0
        } else {
            self.file_size.saturating_sub(self.valid_bytes)
        }
    }

    fn is_ok(&self) -> bool {
        self.malformed.is_none()
    }
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying record log at {}", path.display());
    println!();

    let result = check(path)?;
    println!("  Records:     {}", result.records);
    println!("  Valid bytes: {} of {}", result.valid_bytes, result.file_size);
    if result.torn_bytes() > 0 {
        println!(
            "  Torn tail:   {} bytes (run `repair` to remove)",
            result.torn_bytes()
        );
    }
    if let Some(reason) = &result.malformed {
        println!("  Error:       {reason}");
    }

    println!();
    if result.is_ok() {
        println!("✓ Record log verification passed");
        Ok(())
    } else {
        println!("✗ Record log verification failed");
        Err("Verification failed".into())
    }
}

/// Scans the log read-only and reports where the valid data ends.
pub fn check(path: &Path) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let file_size = fs::metadata(path)?.len();
    let log = RecordLog::open_read_only(path)?;

    let (position, malformed) = with_log(log, |log| match log.count() {
        Ok(_) => Ok((log.position(), None)),
        Err(err @ LogError::MalformedData { .. }) => Ok((log.position(), Some(err.to_string()))),
        Err(err) => Err(err),
    })?;

    Ok(VerifyResult {
        records: position.index,
        valid_bytes: position.pos,
        file_size,
        malformed,
    })
}
