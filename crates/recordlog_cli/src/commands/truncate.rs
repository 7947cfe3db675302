//! Truncate command implementation.

use super::with_log;
use recordlog_core::RecordLog;
use std::path::Path;
use tracing::info;

/// Runs the truncate command.
pub fn run(path: &Path, record_count: u64) -> Result<(), Box<dyn std::error::Error>> {
    let before = truncate(path, record_count)?;
    println!("Truncated {} from {} to {} records", path.display(), before, record_count);
    Ok(())
}

/// Keeps the first `record_count` records and returns the previous count.
pub fn truncate(path: &Path, record_count: u64) -> Result<u64, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No record log found at {}", path.display()).into());
    }

    info!("Truncating record log {:?} to {} records", path, record_count);
    let log = RecordLog::open(path)?;
    let before = with_log(log, |log| {
        let before = log.count()?;
        log.truncate(record_count)?;
        log.commit()?;
        Ok(before)
    })?;
    Ok(before)
}
