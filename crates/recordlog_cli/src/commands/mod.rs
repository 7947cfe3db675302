//! CLI command implementations.

pub mod append;
pub mod dump;
pub mod repair;
pub mod stats;
pub mod truncate;
pub mod verify;

use recordlog_core::{LogResult, RecordLog};

/// Runs `f` on `log` and closes the handle whether or not `f` succeeded.
///
/// An error from `f` takes precedence over an error from closing.
pub(crate) fn with_log<T>(
    mut log: RecordLog,
    f: impl FnOnce(&mut RecordLog) -> LogResult<T>,
) -> LogResult<T> {
    let result = f(&mut log);
    let closed = log.close();
    let value = result?;
    closed?;
    Ok(value)
}

/// Lowercase hex encoding.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordlog_core::LogError;
    use tempfile::tempdir;

    #[test]
    fn with_log_closes_on_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.log");

        let log = RecordLog::open(&path).unwrap();
        let result: LogResult<()> = with_log(log, |_| Err(LogError::invalid_seek("boom")));
        assert!(matches!(result, Err(LogError::InvalidSeek { .. })));

        // The lock was released, so a new writer gets in.
        let log = RecordLog::open(&path).unwrap();
        with_log(log, |log| log.append(b"x")).unwrap();
    }

    #[test]
    fn hex() {
        assert_eq!(hex_encode(&[0x00, 0xab, 0x7f]), "00ab7f");
        assert_eq!(hex_encode(&[]), "");
    }
}
