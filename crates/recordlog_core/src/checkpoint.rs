//! Sparse position index.
//!
//! The index remembers a cursor every `spacing` bytes so that a seek can
//! start replaying from the nearest known position instead of the start of
//! the file. Entries only ever describe positions the handle has actually
//! read or written; when a seek moves back past an entry, everything after
//! the checkpoint it started from is discarded because the tail of the file
//! may since have been truncated or rewritten.
//!
//! ## Invariants
//!
//! - The first entry is always [`Cursor::START`]
//! - Entries are strictly increasing in both `index` and `pos`

use crate::cursor::Cursor;

/// Ordered list of verified checkpoints.
#[derive(Debug, Clone)]
pub struct CheckpointIndex {
    entries: Vec<Cursor>,
    spacing: u64,
}

impl CheckpointIndex {
    /// Creates an index holding only the start of the log.
    #[must_use]
    pub fn new(spacing: u64) -> Self {
        Self {
            entries: vec![Cursor::START],
            spacing: spacing.max(1),
        }
    }

    /// Minimum byte distance between consecutive entries.
    #[must_use]
    pub const fn spacing(&self) -> u64 {
        self.spacing
    }

    /// The most recent checkpoint.
    #[must_use]
    pub fn last(&self) -> Cursor {
        // Never empty: `new` seeds START and `retain_through` keeps slot 0.
        self.entries[self.entries.len() - 1]
    }

    /// All checkpoints, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Cursor] {
        &self.entries
    }

    /// Number of checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; the start of the log is always indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records `cursor` if it lies at least `spacing` bytes past the last
    /// checkpoint. Returns `true` if a checkpoint was added.
    pub fn observe(&mut self, cursor: Cursor) -> bool {
        let last = self.last();
        if cursor.pos.saturating_sub(last.pos) >= self.spacing && cursor.index > last.index {
            self.entries.push(cursor);
            true
        } else {
            false
        }
    }

    /// Returns the slot of the checkpoint with the greatest index `<= target`.
    #[must_use]
    pub fn floor(&self, target: u64) -> usize {
        // entries[lo].index <= target < entries[hi].index (hi may be one past the end)
        let (mut lo, mut hi) = (0, self.entries.len());
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.entries[mid].index <= target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Returns the checkpoint at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    #[must_use]
    pub fn get(&self, slot: usize) -> Cursor {
        self.entries[slot]
    }

    /// Drops every checkpoint after `slot`.
    pub fn retain_through(&mut self, slot: usize) {
        self.entries.truncate(slot + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn index_with(points: &[(u64, u64)]) -> CheckpointIndex {
        let mut index = CheckpointIndex::new(10);
        for &(i, pos) in points {
            assert!(index.observe(Cursor::new(i, pos)));
        }
        index
    }

    #[test]
    fn starts_at_origin() {
        let index = CheckpointIndex::new(32 * 1024);
        assert_eq!(index.as_slice(), &[Cursor::START]);
        assert_eq!(index.last(), Cursor::START);
        assert!(!index.is_empty());
    }

    #[test]
    fn observe_respects_spacing() {
        let mut index = CheckpointIndex::new(10);
        assert!(!index.observe(Cursor::new(1, 9)));
        assert!(index.observe(Cursor::new(2, 10)));
        assert!(!index.observe(Cursor::new(3, 19)));
        assert!(index.observe(Cursor::new(4, 25)));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn floor_finds_nearest_at_or_before() {
        let index = index_with(&[(5, 100), (9, 200), (20, 300)]);
        assert_eq!(index.floor(0), 0);
        assert_eq!(index.floor(4), 0);
        assert_eq!(index.floor(5), 1);
        assert_eq!(index.floor(8), 1);
        assert_eq!(index.floor(9), 2);
        assert_eq!(index.floor(19), 2);
        assert_eq!(index.floor(20), 3);
        assert_eq!(index.floor(u64::MAX), 3);
    }

    #[test]
    fn floor_on_single_entry() {
        let index = CheckpointIndex::new(1);
        assert_eq!(index.floor(0), 0);
        assert_eq!(index.floor(1_000), 0);
    }

    #[test]
    fn retain_through_drops_later_entries() {
        let mut index = index_with(&[(5, 100), (9, 200), (20, 300)]);
        index.retain_through(1);
        assert_eq!(index.as_slice(), &[Cursor::START, Cursor::new(5, 100)]);
        assert_eq!(index.last(), Cursor::new(5, 100));

        index.retain_through(0);
        assert_eq!(index.as_slice(), &[Cursor::START]);
    }

    #[test]
    fn zero_spacing_clamped() {
        let mut index = CheckpointIndex::new(0);
        assert_eq!(index.spacing(), 1);
        assert!(index.observe(Cursor::new(1, 1)));
    }

    proptest! {
        #[test]
        fn floor_matches_linear_scan(
            frame_lens in prop::collection::vec(1u64..200, 0..200),
            spacing in 1u64..500,
            target in 0u64..250,
        ) {
            let mut index = CheckpointIndex::new(spacing);
            let mut cursor = Cursor::START;
            for len in frame_lens {
                cursor = cursor.advanced(len);
                index.observe(cursor);
            }

            let entries = index.as_slice();
            let expected = entries
                .iter()
                .rposition(|c| c.index <= target)
                .unwrap();
            prop_assert_eq!(index.floor(target), expected);
        }
    }
}
