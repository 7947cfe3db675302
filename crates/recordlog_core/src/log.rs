//! The record log handle.
//!
//! A [`RecordLog`] owns one open log file and walks it frame by frame. The
//! handle tracks where it is both logically (record index) and physically
//! (byte offset) and keeps a sparse [`CheckpointIndex`] so random access
//! only replays the frames after the nearest checkpoint.
//!
//! ## Recovery Policy
//!
//! - **Clean end**: a read that finds zero bytes → `Ok(None)`
//! - **Torn tail**: a partial prefix or a payload shorter than its prefix
//!   claims → the frame is discarded; write handles truncate the file back
//!   to the last complete frame, read-only handles leave it alone. Either
//!   way the caller sees end-of-stream.
//! - **Malformed prefix**: a negative or overflowing length →
//!   `Err(MalformedData)`, never repaired
//!
//! ## Handle Lifecycle
//!
//! Write handles hold an exclusive advisory lock from open until
//! [`RecordLog::close`]. Every handle must be closed explicitly; dropping an
//! open handle panics.

use crate::checkpoint::CheckpointIndex;
use crate::config::LogConfig;
use crate::cursor::Cursor;
use crate::error::{LogError, LogResult};
use crate::lock;
use recordlog_codec::{decode_header, encode_frame, CodecError, MAX_VARINT_LEN64};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Reference point for [`RecordLog::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Offset counts from record 0.
    Start,
    /// Offset counts from the current record.
    Current,
    /// Offset counts from one past the last record.
    End,
}

/// How the handle was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Read-write with the exclusive lock held.
    Write,
    /// Read-only, unlocked.
    ReadOnly,
}

/// Outcome of decoding one frame from the current file position.
enum Frame {
    Record { payload: Vec<u8>, frame_len: u64 },
    End,
    Torn,
}

/// An open append-only record log.
///
/// # Thread Safety
///
/// All methods take `&mut self`; the handle does no internal locking and is
/// meant to be driven from one thread at a time.
///
/// # Example
///
/// ```no_run
/// use recordlog_core::{RecordLog, SeekOrigin};
///
/// let mut log = RecordLog::open("blocks.log")?;
/// log.append(b"first")?;
/// log.append(b"second")?;
/// log.commit()?;
///
/// log.seek(1, SeekOrigin::Start)?;
/// assert_eq!(log.read()?.as_deref(), Some(&b"second"[..]));
/// log.close()?;
/// # Ok::<(), recordlog_core::LogError>(())
/// ```
#[derive(Debug)]
pub struct RecordLog {
    path: PathBuf,
    /// `None` once closed.
    file: Option<File>,
    access: Access,
    at_end: bool,
    cursor: Cursor,
    checkpoints: CheckpointIndex,
}

impl RecordLog {
    /// Opens or creates a log for writing with the default configuration.
    ///
    /// # Errors
    ///
    /// - [`LogError::LockUnavailable`] if another write handle is open on `path`
    /// - [`LogError::Io`] if the file cannot be opened or created
    pub fn open(path: impl AsRef<Path>) -> LogResult<Self> {
        Self::open_with_config(path, &LogConfig::default())
    }

    /// Opens or creates a log for writing.
    ///
    /// # Errors
    ///
    /// Same as [`RecordLog::open`].
    pub fn open_with_config(path: impl AsRef<Path>, config: &LogConfig) -> LogResult<Self> {
        let path = path.as_ref();
        if config.create_dirs {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(path)?;

        // On failure `file` drops here, closing the descriptor.
        lock::lock_exclusive(&file, path)?;

        debug!(path = %path.display(), "opened record log for writing");
        Ok(Self::with_file(path, file, Access::Write, config))
    }

    /// Opens an existing log for reading only, with the default configuration.
    ///
    /// No lock is taken, so this may run alongside a writer. Records appended
    /// concurrently may show up as a torn tail, which reads as end-of-stream.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] if the file cannot be opened.
    pub fn open_read_only(path: impl AsRef<Path>) -> LogResult<Self> {
        Self::open_read_only_with_config(path, &LogConfig::default())
    }

    /// Opens an existing log for reading only.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] if the file cannot be opened.
    pub fn open_read_only_with_config(
        path: impl AsRef<Path>,
        config: &LogConfig,
    ) -> LogResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).open(path)?;

        debug!(path = %path.display(), "opened record log read-only");
        Ok(Self::with_file(path, file, Access::ReadOnly, config))
    }

    fn with_file(path: &Path, file: File, access: Access, config: &LogConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            file: Some(file),
            access,
            at_end: false,
            cursor: Cursor::START,
            checkpoints: CheckpointIndex::new(config.checkpoint_spacing),
        }
    }

    /// Returns the path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if this handle cannot write.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.access == Access::ReadOnly
    }

    /// Returns `true` once [`RecordLog::close`] has succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Returns the current position: the index of the next record to read
    /// and its byte offset.
    #[must_use]
    pub fn position(&self) -> Cursor {
        self.cursor
    }

    /// Returns the checkpoints currently known to the seek index.
    #[must_use]
    pub fn checkpoints(&self) -> &[Cursor] {
        self.checkpoints.as_slice()
    }

    /// Reads the next record and advances past it.
    ///
    /// Returns `Ok(None)` at end-of-stream, including when the last frame is
    /// torn. On a write handle a torn tail is truncated away before
    /// returning.
    ///
    /// # Errors
    ///
    /// - [`LogError::MalformedData`] if the next prefix is negative or overflows
    /// - [`LogError::AlreadyClosed`] if the handle is closed
    /// - [`LogError::Io`] on read, seek or truncate failure
    pub fn read(&mut self) -> LogResult<Option<Vec<u8>>> {
        let start = self.cursor.pos;
        let frame = match read_frame(self.file_mut()?) {
            Ok(frame) => frame,
            Err(FrameError::Malformed(source)) => {
                self.reposition(start)?;
                return Err(LogError::malformed(start, source));
            }
            Err(FrameError::Io(err)) => return Err(err.into()),
        };

        match frame {
            Frame::Record { payload, frame_len } => {
                self.advance(frame_len);
                Ok(Some(payload))
            }
            Frame::End => {
                self.at_end = true;
                Ok(None)
            }
            Frame::Torn => {
                self.heal_torn_tail()?;
                self.at_end = true;
                Ok(None)
            }
        }
    }

    /// Returns an iterator that reads records from the current position
    /// until end-of-stream.
    ///
    /// Iteration stops after the first error.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            log: self,
            done: false,
        }
    }

    /// Appends `payload` as a new record at the end of the log.
    ///
    /// If the handle is not already at the end, it first scans forward to
    /// it (healing any torn tail), so records are never written mid-stream.
    /// The record is not durable until [`RecordLog::commit`].
    ///
    /// # Errors
    ///
    /// - [`LogError::AlreadyClosed`] if the handle is closed
    /// - [`LogError::MalformedData`] if the scan to the end hits a bad prefix
    /// - [`LogError::Io`] on write failure
    ///
    /// # Panics
    ///
    /// Panics if the handle was opened read-only.
    pub fn append(&mut self, payload: &[u8]) -> LogResult<()> {
        self.ensure_open()?;
        self.assert_writable("append");

        if !self.at_end {
            self.scan_to_end()?;
        }

        let frame = encode_frame(payload);
        if let Err(err) = self.file_mut()?.write_all(&frame) {
            // Part of the frame may be on disk; rescan before the next append.
            self.at_end = false;
            return Err(err.into());
        }
        self.advance(frame.len() as u64);
        Ok(())
    }

    /// Forces every record appended so far onto durable storage.
    ///
    /// # Errors
    ///
    /// - [`LogError::AlreadyClosed`] if the handle is closed
    /// - [`LogError::Io`] if the sync fails
    pub fn commit(&mut self) -> LogResult<()> {
        self.file_mut()?.sync_all()?;
        Ok(())
    }

    /// Moves to the record at `offset` relative to `origin` and returns its
    /// absolute index.
    ///
    /// Seeking to one past the last record (the end) is allowed. The move
    /// starts from the nearest checkpoint at or before the target and
    /// replays the frames in between.
    ///
    /// # Errors
    ///
    /// - [`LogError::InvalidSeek`] if the target is negative or past the end
    /// - [`LogError::MalformedData`] if the replay hits a bad prefix
    /// - [`LogError::AlreadyClosed`] if the handle is closed
    /// - [`LogError::Io`] on read or seek failure
    pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> LogResult<u64> {
        self.ensure_open()?;

        let base = match origin {
            SeekOrigin::Start => 0,
            SeekOrigin::Current => self.cursor.index,
            SeekOrigin::End => {
                self.scan_to_end()?;
                self.cursor.index
            }
        };
        let target = i64::try_from(base)
            .ok()
            .and_then(|base| base.checked_add(offset))
            .ok_or_else(|| LogError::invalid_seek(format!("offset {offset} overflows")))?;
        let Ok(target) = u64::try_from(target) else {
            return Err(LogError::invalid_seek(format!(
                "record {target} is before start"
            )));
        };

        if target == self.cursor.index {
            return Ok(target);
        }

        let slot = self.checkpoints.floor(target);
        let checkpoint = self.checkpoints.get(slot);
        if target < self.cursor.index || checkpoint.index > self.cursor.index {
            self.reposition(checkpoint.pos)?;
            self.cursor = checkpoint;
        }
        self.checkpoints.retain_through(slot);

        self.at_end = false;
        while self.cursor.index != target {
            if self.read()?.is_none() {
                return Err(LogError::invalid_seek(format!(
                    "record {target} is after end ({} records)",
                    self.cursor.index
                )));
            }
        }
        Ok(target)
    }

    /// Moves to the record at absolute index `index`.
    ///
    /// # Errors
    ///
    /// Same as [`RecordLog::seek`].
    pub fn seek_to(&mut self, index: u64) -> LogResult<u64> {
        let offset = i64::try_from(index)
            .map_err(|_| LogError::invalid_seek(format!("record {index} is after end")))?;
        self.seek(offset, SeekOrigin::Start)
    }

    /// Returns the number of records, leaving the handle at the end.
    ///
    /// # Errors
    ///
    /// Same as [`RecordLog::seek`].
    pub fn count(&mut self) -> LogResult<u64> {
        self.seek(0, SeekOrigin::End)
    }

    /// Discards every record from index `record_count` onward, leaving
    /// exactly `record_count` records.
    ///
    /// # Errors
    ///
    /// - [`LogError::InvalidSeek`] if fewer than `record_count` records exist
    /// - [`LogError::AlreadyClosed`] if the handle is closed
    /// - [`LogError::Io`] on seek or truncate failure
    ///
    /// # Panics
    ///
    /// Panics if the handle was opened read-only.
    pub fn truncate(&mut self, record_count: u64) -> LogResult<()> {
        self.ensure_open()?;
        self.assert_writable("truncate");

        self.seek_to(record_count)?;
        let pos = self.cursor.pos;
        self.file_mut()?.set_len(pos)?;
        self.at_end = true;

        debug!(path = %self.path.display(), records = record_count, bytes = pos, "truncated record log");
        Ok(())
    }

    /// Closes the handle, releasing the lock (write handles) and the file.
    ///
    /// # Errors
    ///
    /// - [`LogError::AlreadyClosed`] if called a second time
    /// - [`LogError::Io`] if releasing the lock fails; the file is closed
    ///   regardless
    pub fn close(&mut self) -> LogResult<()> {
        let file = self.file.take().ok_or(LogError::AlreadyClosed)?;

        let result = match self.access {
            Access::Write => lock::unlock(&file),
            Access::ReadOnly => Ok(()),
        };
        drop(file);

        debug!(path = %self.path.display(), "closed record log");
        result
    }

    fn ensure_open(&self) -> LogResult<()> {
        if self.file.is_none() {
            return Err(LogError::AlreadyClosed);
        }
        Ok(())
    }

    fn file_mut(&mut self) -> LogResult<&mut File> {
        self.file.as_mut().ok_or(LogError::AlreadyClosed)
    }

    fn assert_writable(&self, operation: &str) {
        assert!(
            self.access == Access::Write,
            "{operation} called on read-only record log {}",
            self.path.display()
        );
    }

    /// Moves the file offset to `pos`.
    fn reposition(&mut self, pos: u64) -> LogResult<()> {
        let landed = self.file_mut()?.seek(SeekFrom::Start(pos))?;
        debug_assert_eq!(landed, pos);
        Ok(())
    }

    /// Steps the cursor past one frame and records a checkpoint if due.
    fn advance(&mut self, frame_len: u64) {
        self.cursor = self.cursor.advanced(frame_len);
        self.checkpoints.observe(self.cursor);
    }

    /// Reads from the last checkpoint until end-of-stream.
    fn scan_to_end(&mut self) -> LogResult<()> {
        let from = self.checkpoints.last();
        self.reposition(from.pos)?;
        self.cursor = from;

        while self.read()?.is_some() {}
        Ok(())
    }

    /// Drops a partial trailing frame after the cursor.
    fn heal_torn_tail(&mut self) -> LogResult<()> {
        let pos = self.cursor.pos;
        self.reposition(pos)?;

        match self.access {
            Access::Write => {
                self.file_mut()?.set_len(pos)?;
                warn!(
                    path = %self.path.display(),
                    records = self.cursor.index,
                    offset = pos,
                    "truncated torn trailing record"
                );
            }
            Access::ReadOnly => {
                warn!(
                    path = %self.path.display(),
                    records = self.cursor.index,
                    offset = pos,
                    "incomplete trailing record, treating as end"
                );
            }
        }
        Ok(())
    }
}

impl Drop for RecordLog {
    fn drop(&mut self) {
        if self.file.is_none() {
            return;
        }
        if std::thread::panicking() {
            error!(path = %self.path.display(), "record log dropped without close while unwinding");
            return;
        }
        panic!(
            "record log {} dropped without a call to close",
            self.path.display()
        );
    }
}

/// Iterator returned by [`RecordLog::records`].
#[derive(Debug)]
pub struct Records<'a> {
    log: &'a mut RecordLog,
    done: bool,
}

impl Iterator for Records<'_> {
    type Item = LogResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.log.read() {
            Ok(Some(payload)) => Some(Ok(payload)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

enum FrameError {
    Malformed(CodecError),
    Io(io::Error),
}

impl From<io::Error> for FrameError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Decodes the frame at the file's current offset.
///
/// On success the offset sits just past the frame. After `Torn` or an
/// error the offset is unspecified and the caller repositions.
fn read_frame(file: &mut File) -> Result<Frame, FrameError> {
    let mut prefix = [0u8; MAX_VARINT_LEN64];
    let filled = read_up_to(file, &mut prefix)?;
    if filled == 0 {
        return Ok(Frame::End);
    }

    let header = match decode_header(&prefix[..filled]) {
        Ok(header) => header,
        Err(CodecError::Incomplete) => return Ok(Frame::Torn),
        Err(err) => return Err(FrameError::Malformed(err)),
    };

    // Give back the speculatively read bytes that belong to the payload.
    let overshoot = (filled - header.prefix_len) as i64;
    if overshoot > 0 {
        file.seek(SeekFrom::Current(-overshoot))?;
    }

    let mut payload = Vec::new();
    Read::take(&mut *file, header.payload_len).read_to_end(&mut payload)?;
    if (payload.len() as u64) < header.payload_len {
        return Ok(Frame::Torn);
    }

    Ok(Frame::Record {
        payload,
        frame_len: header.frame_len(),
    })
}

/// Fills as much of `buf` as the file allows, stopping early only at EOF.
fn read_up_to(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
