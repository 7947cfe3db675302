//! Logical/physical position pairs.

/// A position in the log.
///
/// `pos` is the byte offset immediately after the first `index` frames when
/// reading from the start of the file. `Cursor::START` is the file start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    /// Number of frames before this position.
    pub index: u64,
    /// Byte offset of this position.
    pub pos: u64,
}

impl Cursor {
    /// The start of the log.
    pub const START: Self = Self { index: 0, pos: 0 };

    /// Creates a cursor.
    #[must_use]
    pub const fn new(index: u64, pos: u64) -> Self {
        Self { index, pos }
    }

    /// Returns the cursor after one more frame of `frame_len` bytes.
    #[must_use]
    pub const fn advanced(self, frame_len: u64) -> Self {
        Self {
            index: self.index + 1,
            pos: self.pos + frame_len,
        }
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}@{}", self.index, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_both_fields() {
        let cursor = Cursor::START.advanced(6).advanced(1);
        assert_eq!(cursor, Cursor::new(2, 7));
    }

    #[test]
    fn display() {
        assert_eq!(Cursor::new(3, 120).to_string(), "#3@120");
    }
}
