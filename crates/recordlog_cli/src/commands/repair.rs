//! Repair command implementation.

use super::with_log;
use recordlog_core::RecordLog;
use std::fs;
use std::path::Path;
use tracing::info;

/// Runs the repair command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (records, removed) = repair(path)?;
    if removed > 0 {
        println!("Removed {removed} bytes of torn tail; {records} records remain");
    } else {
        println!("Nothing to repair; {records} records");
    }
    Ok(())
}

/// Heals a torn tail by scanning the log with a write handle.
///
/// Returns the record count and the number of bytes removed.
pub fn repair(path: &Path) -> Result<(u64, u64), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No record log found at {}", path.display()).into());
    }

    info!("Repairing record log {:?}", path);
    let before = fs::metadata(path)?.len();
    let log = RecordLog::open(path)?;
    let records = with_log(log, |log| {
        let records = log.count()?;
        log.commit()?;
        Ok(records)
    })?;
    let after = fs::metadata(path)?.len();

    Ok((records, bytes_removed(before, after)))
}

/// Bytes cut from the file, zero if it grew in the meantime.
fn bytes_removed(before: u64, after: u64) -> u64 {
    before.saturating_sub(after)
}
