//! Property-based test generators using proptest.
//!
//! Provides strategies for payloads, batches of records, operation sequences
//! and the kinds of tail damage a crash can leave behind.

use crate::crash::TailDamage;
use proptest::prelude::*;

/// Strategy for a single record payload, empty payloads included.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

/// Strategy for payloads large enough to need a multi-byte length prefix.
pub fn large_payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 64..2048)
}

/// Strategy for a batch of records.
pub fn batch_strategy(max_records: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(payload_strategy(), 0..=max_records)
}

/// Strategy for a checkpoint spacing small enough that short logs still
/// produce several checkpoints.
pub fn spacing_strategy() -> impl Strategy<Value = u64> {
    1u64..512
}

/// An operation against a write handle.
#[derive(Debug, Clone)]
pub enum LogOp {
    /// Append a record.
    Append(Vec<u8>),
    /// Commit pending appends.
    Commit,
    /// Seek to an absolute record index; may lie past the end.
    Seek(u64),
    /// Read the next record.
    Read,
    /// Count the records in the log.
    Count,
}

/// Strategy for log operations.
pub fn log_op_strategy() -> impl Strategy<Value = LogOp> {
    prop_oneof![
        4 => payload_strategy().prop_map(LogOp::Append),
        1 => Just(LogOp::Commit),
        2 => (0u64..64).prop_map(LogOp::Seek),
        3 => Just(LogOp::Read),
        1 => Just(LogOp::Count),
    ]
}

/// Strategy for a sequence of operations.
pub fn op_sequence_strategy(max_ops: usize) -> impl Strategy<Value = Vec<LogOp>> {
    prop::collection::vec(log_op_strategy(), 1..max_ops)
}

/// Strategy for tail damage that readers must treat as end-of-stream.
pub fn torn_damage_strategy() -> impl Strategy<Value = TailDamage> {
    prop_oneof![
        Just(TailDamage::TornHeader),
        (1u64..4096)
            .prop_flat_map(|declared| (Just(declared), 0..declared))
            .prop_map(|(declared, written)| TailDamage::TornPayload { declared, written }),
    ]
}

/// Strategy for tail damage that must be reported as malformed.
pub fn malformed_damage_strategy() -> impl Strategy<Value = TailDamage> {
    prop_oneof![
        (1i64..=i64::MAX).prop_map(|len| TailDamage::NegativeLength(-len)),
        Just(TailDamage::OverlongPrefix),
    ]
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 128,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn large_payloads_need_two_byte_prefix(payload in large_payload_strategy()) {
            prop_assert!(recordlog_codec::encoded_len(payload.len()) - payload.len() >= 2);
        }

        #[test]
        fn torn_payload_is_short(damage in torn_damage_strategy()) {
            if let TailDamage::TornPayload { declared, written } = damage {
                prop_assert!(written < declared);
            }
        }

        #[test]
        fn malformed_damage_is_never_torn(damage in malformed_damage_strategy()) {
            prop_assert!(!damage.is_torn());
        }
    }
}
