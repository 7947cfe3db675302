//! Dump command implementation.

use super::{hex_encode, with_log};
use recordlog_core::RecordLog;
use serde::Serialize;
use std::path::Path;

/// Bytes of payload shown per record in text output.
const TEXT_PREVIEW: usize = 32;

/// Record representation for output.
#[derive(Debug, Serialize)]
pub struct RecordInfo {
    /// Record index.
    pub index: u64,
    /// Byte offset of the frame.
    pub offset: u64,
    /// Payload length in bytes.
    pub len: usize,
    /// Hex-encoded payload.
    pub payload: String,
}

/// Runs the dump command.
pub fn run(
    path: &Path,
    start: u64,
    limit: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = collect(path, start, limit)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => print_text_output(&records),
    }

    Ok(())
}

/// Reads up to `limit` records starting at index `start`.
pub fn collect(
    path: &Path,
    start: u64,
    limit: Option<usize>,
) -> Result<Vec<RecordInfo>, Box<dyn std::error::Error>> {
    let max_records = limit.unwrap_or(usize::MAX);
    let log = RecordLog::open_read_only(path)?;

    let records = with_log(log, |log| {
        log.seek_to(start)?;
        let mut records = Vec::new();
        while records.len() < max_records {
            let at = log.position();
            let Some(payload) = log.read()? else {
                break;
            };
            records.push(RecordInfo {
                index: at.index,
                offset: at.pos,
                len: payload.len(),
                payload: hex_encode(&payload),
            });
        }
        Ok(records)
    })?;

    Ok(records)
}

fn print_text_output(records: &[RecordInfo]) {
    println!("Records ({} shown)", records.len());
    println!("================");
    println!();

    for record in records {
        let shown = record.payload.len().min(TEXT_PREVIEW * 2);
        let ellipsis = if shown < record.payload.len() { "..." } else { "" };
        println!(
            "#{:<8} [{:010}] len={:<6} {}{}",
            record.index,
            record.offset,
            record.len,
            &record.payload[..shown],
            ellipsis
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_log(path: &Path) {
        let mut log = RecordLog::open(path).unwrap();
        for payload in [&b"\x01\x02"[..], b"", b"abc"] {
            log.append(payload).unwrap();
        }
        log.close().unwrap();
    }

    #[test]
    fn dump_all() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.log");
        sample_log(&path);

        let records = collect(&path, 0, None).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].payload, "0102");
        assert_eq!(records[1].offset, 3);
        assert_eq!(records[1].len, 0);
        assert_eq!(records[2].index, 2);
        assert_eq!(records[2].offset, 4);
        assert_eq!(records[2].payload, "616263");
    }

    #[test]
    fn dump_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.log");
        sample_log(&path);

        let records = collect(&path, 1, Some(1)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 1);
    }

    #[test]
    fn dump_past_end_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.log");
        sample_log(&path);

        assert!(collect(&path, 4, None).is_err());
        assert!(collect(&path, 3, None).unwrap().is_empty());
    }
}
