//! Append command implementation.

use super::with_log;
use recordlog_core::{ingest, IngestOptions, IngestStats, LogConfig, LogResult, RecordLog};
use std::io::{self, BufRead};
use std::path::Path;
use tracing::info;

/// Runs the append command.
///
/// Each value becomes one record. With no values, each line of stdin
/// (without its newline) becomes one record.
pub fn run(
    path: &Path,
    commit_every: usize,
    values: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = if values.is_empty() {
        let stdin = io::stdin();
        append_from(path, stdin.lock().lines(), commit_every)?
    } else {
        append_from(path, values.into_iter().map(Ok::<_, io::Error>), commit_every)?
    };

    println!(
        "Appended {} records ({} bytes, {} commits)",
        stats.records, stats.bytes, stats.commits
    );
    Ok(())
}

/// Appends every payload from `source` to the log at `path`, creating it
/// if needed.
pub fn append_from<I, P, E>(path: &Path, source: I, commit_every: usize) -> LogResult<IngestStats>
where
    I: IntoIterator<Item = Result<P, E>>,
    P: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    info!("Appending to record log {:?}", path);
    let config = LogConfig::new().create_dirs(true);
    let options = IngestOptions::new().commit_every(commit_every);
    let log = RecordLog::open_with_config(path, &config)?;
    with_log(log, |log| ingest(log, source, &options))
}
