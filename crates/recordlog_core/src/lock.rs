//! Advisory locking for write handles.
//!
//! The lock is taken on the log file itself with `flock`-style advisory
//! locking, so it is released automatically when the descriptor closes even
//! if the process dies. Only one write handle per path may exist at a time;
//! read-only handles never lock.

use crate::error::{LogError, LogResult};
use fs2::FileExt;
use std::fs::File;
use std::path::Path;

/// Takes the exclusive lock on `file` without waiting.
///
/// # Errors
///
/// - [`LogError::LockUnavailable`] if another handle holds the lock
/// - [`LogError::Io`] for any other locking failure
pub(crate) fn lock_exclusive(file: &File, path: &Path) -> LogResult<()> {
    match file.try_lock_exclusive() {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
            Err(LogError::LockUnavailable {
                path: path.to_path_buf(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Releases the lock taken by [`lock_exclusive`].
pub(crate) fn unlock(file: &File) -> LogResult<()> {
    FileExt::unlock(file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use tempfile::tempdir;

    fn open(path: &Path) -> File {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .unwrap()
    }

    #[test]
    fn lock_prevents_second_lock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.log");

        let first = open(&path);
        lock_exclusive(&first, &path).unwrap();

        let second = open(&path);
        let result = lock_exclusive(&second, &path);
        assert!(matches!(result, Err(LogError::LockUnavailable { .. })));
    }

    #[test]
    fn unlock_allows_relock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.log");

        let first = open(&path);
        lock_exclusive(&first, &path).unwrap();
        unlock(&first).unwrap();

        let second = open(&path);
        lock_exclusive(&second, &path).unwrap();
    }
}
