//! Forwarding an upstream payload stream into a log.
//!
//! The log does not care where payloads come from. An upstream producer
//! (a block stream consumer, a file reader, stdin) is any iterator of
//! `Result<payload, error>`; [`ingest`] appends each payload in order and
//! commits in batches so a crash loses at most one batch.

use crate::error::{LogError, LogResult};
use crate::log::RecordLog;
use tracing::{debug, info, warn};

/// Default number of records between two commits.
pub const DEFAULT_COMMIT_EVERY: usize = 64;

/// Options for [`ingest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Records appended between commits. Zero commits only once at the end.
    pub commit_every: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            commit_every: DEFAULT_COMMIT_EVERY,
        }
    }
}

impl IngestOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of records between commits.
    #[must_use]
    pub const fn commit_every(mut self, records: usize) -> Self {
        self.commit_every = records;
        self
    }
}

/// Counters reported by [`ingest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Records appended.
    pub records: u64,
    /// Payload bytes appended, excluding length prefixes.
    pub bytes: u64,
    /// Commits issued.
    pub commits: u64,
}

/// Appends every payload from `source` to `log`.
///
/// Commits after every `options.commit_every` records and once more after
/// the source is exhausted. If the source yields an error, the records
/// already appended are committed before the error is returned.
///
/// # Errors
///
/// - [`LogError::Source`] if the source yields an error
/// - any error from [`RecordLog::append`] or [`RecordLog::commit`]
///
/// # Panics
///
/// Panics if `log` is read-only.
pub fn ingest<I, P, E>(
    log: &mut RecordLog,
    source: I,
    options: &IngestOptions,
) -> LogResult<IngestStats>
where
    I: IntoIterator<Item = Result<P, E>>,
    P: AsRef<[u8]>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut stats = IngestStats::default();
    let mut pending = 0usize;

    for item in source {
        let payload = match item {
            Ok(payload) => payload,
            Err(err) => {
                if pending > 0 {
                    log.commit()?;
                    stats.commits += 1;
                }
                let err = err.into();
                warn!(records = stats.records, error = %err, "payload source failed");
                return Err(LogError::Source(err));
            }
        };

        let payload = payload.as_ref();
        log.append(payload)?;
        stats.records += 1;
        stats.bytes += payload.len() as u64;
        pending += 1;

        if options.commit_every > 0 && pending >= options.commit_every {
            log.commit()?;
            stats.commits += 1;
            pending = 0;
            debug!(records = stats.records, "committed batch");
        }
    }

    if pending > 0 {
        log.commit()?;
        stats.commits += 1;
    }

    info!(
        path = %log.path().display(),
        records = stats.records,
        bytes = stats.bytes,
        commits = stats.commits,
        "ingest finished"
    );
    Ok(stats)
}
