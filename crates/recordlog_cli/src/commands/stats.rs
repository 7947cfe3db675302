//! Stats command implementation.

use super::with_log;
use recordlog_core::RecordLog;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Summary of a log file.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Log file path.
    pub path: String,
    /// Number of complete records.
    pub records: u64,
    /// File size in bytes.
    pub file_size: u64,
    /// Bytes covered by complete records.
    pub valid_bytes: u64,
    /// Bytes of an incomplete trailing record, if any.
    pub torn_bytes: u64,
    /// Checkpoints built while scanning.
    pub checkpoints: usize,
}

/// Runs the stats command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let report = collect(path)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("Record log: {}", report.path);
            println!("  Records:      {}", report.records);
            println!("  File size:    {} bytes", report.file_size);
            println!("  Valid bytes:  {}", report.valid_bytes);
            if report.torn_bytes > 0 {
                println!("  Torn tail:    {} bytes", report.torn_bytes);
            }
            println!("  Checkpoints:  {}", report.checkpoints);
        }
    }

    Ok(())
}

/// Scans the log read-only and summarizes it.
pub fn collect(path: &Path) -> Result<StatsReport, Box<dyn std::error::Error>> {
    let file_size = fs::metadata(path)?.len();
    let log = RecordLog::open_read_only(path)?;
    let (records, valid_bytes, checkpoints) = with_log(log, |log| {
        let records = log.count()?;
        Ok((records, log.position().pos, log.checkpoints().len()))
    })?;

    Ok(StatsReport {
        path: path.display().to_string(),
        records,
        file_size,
        valid_bytes,
        torn_bytes: file_size.saturating_sub(valid_bytes),
        checkpoints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn stats_of_log_with_torn_tail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.log");

        let mut log = RecordLog::open(&path).unwrap();
        log.append(b"one").unwrap();
        log.append(b"two").unwrap();
        log.close().unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0x10, b'x']).unwrap();

        let report = collect(&path).unwrap();
        assert_eq!(report.records, 2);
        assert_eq!(report.valid_bytes, 8);
        assert_eq!(report.file_size, 10);
        assert_eq!(report.torn_bytes, 2);
        assert_eq!(report.checkpoints, 1);
    }

    #[test]
    fn stats_of_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(collect(&dir.path().join("missing.log")).is_err());
    }
}
