//! Crash scenarios for recovery testing.
//!
//! A [`CrashScenario`] writes a run of well-formed records followed by some
//! [`TailDamage`], the bytes a process could leave behind if it died mid-append
//! or if the file was corrupted. [`CrashScenario::verify`] then reopens the
//! log and checks the recovery rules:
//!
//! - a torn tail reads as end-of-stream; a write handle truncates it away
//! - a malformed prefix is reported at its offset and never repaired

use crate::fixtures::{frames, read_all, TempLog};
use recordlog_codec::{put_varint, MAX_VARINT_LEN64};
use recordlog_core::{LogError, LogResult, RecordLog};

/// Bytes left after the last complete record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailDamage {
    /// The first byte of a multi-byte length prefix, with nothing after it.
    TornHeader,
    /// A complete prefix declaring `declared` bytes, followed by only
    /// `written` of them.
    TornPayload {
        /// Payload length in the prefix.
        declared: u64,
        /// Payload bytes actually present.
        written: u64,
    },
    /// A complete prefix encoding a negative length.
    NegativeLength(i64),
    /// Ten prefix bytes that all carry the continuation bit.
    OverlongPrefix,
}

impl TailDamage {
    /// Returns true if the damage is a torn write rather than corruption.
    pub fn is_torn(&self) -> bool {
        matches!(self, Self::TornHeader | Self::TornPayload { .. })
    }

    /// Returns the raw bytes for this damage.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Self::TornHeader => out.push(0x80),
            Self::TornPayload { declared, written } => {
                put_varint(&mut out, *declared as i64);
                out.extend((0..*written).map(|i| i as u8));
            }
            Self::NegativeLength(len) => {
                put_varint(&mut out, *len);
            }
            Self::OverlongPrefix => out.extend([0xFF; MAX_VARINT_LEN64]),
        }
        out
    }
}

/// Result of a crash recovery check.
#[derive(Debug, Clone)]
pub struct RecoveryResult {
    /// Whether the check passed.
    pub passed: bool,
    /// Description of what was checked.
    pub description: String,
    /// Records expected after recovery.
    pub expected_records: usize,
    /// Records actually read after recovery.
    pub actual_records: usize,
    /// Any error message.
    pub error: Option<String>,
}

impl RecoveryResult {
    /// Creates a passing result.
    pub fn pass(description: &str, records: usize) -> Self {
        Self {
            passed: true,
            description: description.to_string(),
            expected_records: records,
            actual_records: records,
            error: None,
        }
    }

    /// Creates a failing result.
    pub fn fail(description: &str, expected: usize, actual: usize, error: &str) -> Self {
        Self {
            passed: false,
            description: description.to_string(),
            expected_records: expected,
            actual_records: actual,
            error: Some(error.to_string()),
        }
    }
}

/// Which handle kind reopens the damaged log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reopen {
    /// A write handle, which heals torn tails.
    Write,
    /// A read-only handle, which never modifies the file.
    ReadOnly,
}

/// Well-formed records followed by tail damage.
#[derive(Debug, Clone)]
pub struct CrashScenario {
    records: Vec<Vec<u8>>,
    damage: TailDamage,
}

impl CrashScenario {
    /// Creates a scenario.
    pub fn new(records: Vec<Vec<u8>>, damage: TailDamage) -> Self {
        Self { records, damage }
    }

    /// Returns the well-formed records.
    pub fn records(&self) -> &[Vec<u8>] {
        &self.records
    }

    /// Returns the tail damage.
    pub fn damage(&self) -> &TailDamage {
        &self.damage
    }

    /// Byte length of the well-formed prefix of the file.
    pub fn valid_len(&self) -> u64 {
        frames(&self.records).len() as u64
    }

    /// Writes the damaged file into a fresh temporary log.
    pub fn stage(&self) -> TempLog {
        let temp = TempLog::new();
        let mut bytes = frames(&self.records);
        bytes.extend(self.damage.bytes());
        temp.write_raw(&bytes);
        temp
    }

    /// Stages the scenario, reopens it and checks the outcome.
    pub fn verify(&self, reopen: Reopen) -> RecoveryResult {
        let description = format!(
            "{:?} after {} records, {:?}",
            self.damage,
            self.records.len(),
            reopen
        );
        let temp = self.stage();
        let staged_len = temp.file_len();

        let opened = match reopen {
            Reopen::Write => temp.open(),
            Reopen::ReadOnly => temp.open_read_only(),
        };
        let mut log = match opened {
            Ok(log) => log,
            Err(e) => {
                return RecoveryResult::fail(&description, self.records.len(), 0, &e.to_string())
            }
        };

        let outcome = read_all(&mut log);
        let closed = log.close();
        let result = self.judge(&description, outcome, &temp, staged_len, reopen);
        match closed {
            Ok(()) => result,
            Err(e) => RecoveryResult::fail(&description, self.records.len(), 0, &e.to_string()),
        }
    }

    fn judge(
        &self,
        description: &str,
        outcome: LogResult<Vec<Vec<u8>>>,
        temp: &TempLog,
        staged_len: u64,
        reopen: Reopen,
    ) -> RecoveryResult {
        let expected = self.records.len();
        let file_len = temp.file_len();

        if self.damage.is_torn() {
            let records = match outcome {
                Ok(records) => records,
                Err(e) => return RecoveryResult::fail(description, expected, 0, &e.to_string()),
            };
            if records != self.records {
                return RecoveryResult::fail(description, expected, records.len(), "records differ");
            }
            let want_len = match reopen {
                Reopen::Write => self.valid_len(),
                Reopen::ReadOnly => staged_len,
            };
            if file_len != want_len {
                return RecoveryResult::fail(
                    description,
                    expected,
                    records.len(),
                    &format!("file is {file_len} bytes, expected {want_len}"),
                );
            }
            return RecoveryResult::pass(description, expected);
        }

        match outcome {
            Err(LogError::MalformedData { offset, .. }) if offset == self.valid_len() => {
                if file_len != staged_len {
                    return RecoveryResult::fail(
                        description,
                        expected,
                        expected,
                        "malformed tail was modified",
                    );
                }
                RecoveryResult::pass(description, expected)
            }
            Err(e) => RecoveryResult::fail(description, expected, 0, &e.to_string()),
            Ok(records) => RecoveryResult::fail(
                description,
                expected,
                records.len(),
                "malformed tail was not reported",
            ),
        }
    }
}

/// Appends to a healed log and checks the new record lands where the torn
/// tail used to be.
pub fn append_after_heal(scenario: &CrashScenario, payload: &[u8]) -> RecoveryResult {
    let description = format!("append after {:?}", scenario.damage());
    let expected = scenario.records().len() + 1;
    let temp = scenario.stage();

    let run = || -> LogResult<Vec<Vec<u8>>> {
        let mut log: RecordLog = temp.open()?;
        let appended = log.append(payload).and_then(|()| log.commit());
        let records = appended.and_then(|()| read_all(&mut log));
        log.close()?;
        records
    };

    match run() {
        Ok(records) => {
            let mut want = scenario.records().to_vec();
            want.push(payload.to_vec());
            if records == want {
                RecoveryResult::pass(&description, expected)
            } else {
                RecoveryResult::fail(&description, expected, records.len(), "records differ")
            }
        }
        Err(e) => RecoveryResult::fail(&description, expected, 0, &e.to_string()),
    }
}
