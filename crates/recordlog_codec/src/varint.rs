//! Signed LEB128 varints with zigzag mapping.
//!
//! Values are zigzag-mapped to unsigned (`0, -1, 1, -2, ...` becomes
//! `0, 1, 2, 3, ...`) and then written 7 bits at a time, least significant
//! group first, with the high bit set on every byte except the last.

use crate::error::{CodecError, CodecResult};
use bytes::BufMut;

/// Maximum encoded width of a 64-bit varint.
pub const MAX_VARINT_LEN64: usize = 10;

/// Zigzag-maps a signed value so small magnitudes encode short.
#[inline]
#[must_use]
pub const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
#[must_use]
pub const fn zigzag_decode(raw: u64) -> i64 {
    ((raw >> 1) as i64) ^ -((raw & 1) as i64)
}

/// Number of bytes [`put_uvarint`] writes for `value`.
#[inline]
#[must_use]
pub const fn uvarint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Writes `value` as an unsigned varint, returning the number of bytes written.
pub fn put_uvarint<B: BufMut>(buf: &mut B, mut value: u64) -> usize {
    let mut written = 1;
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
        written += 1;
    }
    buf.put_u8(value as u8);
    written
}

/// Writes `value` as a zigzag varint, returning the number of bytes written.
pub fn put_varint<B: BufMut>(buf: &mut B, value: i64) -> usize {
    put_uvarint(buf, zigzag_encode(value))
}

/// Decodes an unsigned varint from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed. Trailing bytes past
/// the terminator are ignored.
///
/// # Errors
///
/// - [`CodecError::Incomplete`] if `bytes` ends before a terminating byte
/// - [`CodecError::Overflow`] if the value needs more than 64 bits
pub fn read_uvarint(bytes: &[u8]) -> CodecResult<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0u32;
    for (i, &byte) in bytes.iter().take(MAX_VARINT_LEN64).enumerate() {
        if byte < 0x80 {
            // The tenth byte may only carry the single remaining bit.
            if i == MAX_VARINT_LEN64 - 1 && byte > 1 {
                return Err(CodecError::Overflow);
            }
            return Ok((result | (u64::from(byte) << shift), i + 1));
        }
        if i == MAX_VARINT_LEN64 - 1 {
            return Err(CodecError::Overflow);
        }
        result |= u64::from(byte & 0x7f) << shift;
        shift += 7;
    }
    Err(CodecError::Incomplete)
}

/// Decodes a zigzag varint from the start of `bytes`.
///
/// # Errors
///
/// Same as [`read_uvarint`].
pub fn read_varint(bytes: &[u8]) -> CodecResult<(i64, usize)> {
    let (raw, width) = read_uvarint(bytes)?;
    Ok((zigzag_decode(raw), width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: i64) -> Vec<u8> {
        let mut buf = Vec::new();
        put_varint(&mut buf, value);
        buf
    }

    #[test]
    fn zigzag_small_magnitudes() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x02]);
        assert_eq!(encode(-1), vec![0x01]);
        assert_eq!(encode(63), vec![0x7e]);
        assert_eq!(encode(64), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xd8, 0x04]);
    }

    #[test]
    fn widths() {
        assert_eq!(encode(0).len(), 1);
        assert_eq!(encode(8191).len(), 2);
        assert_eq!(encode(8192).len(), 3);
        assert_eq!(encode(i64::MAX).len(), MAX_VARINT_LEN64);
        assert_eq!(encode(i64::MIN).len(), MAX_VARINT_LEN64);
    }

    #[test]
    fn uvarint_len_matches_encoding() {
        for value in [0u64, 1, 127, 128, 16_383, 16_384, u64::MAX / 2, u64::MAX] {
            let mut buf = Vec::new();
            assert_eq!(put_uvarint(&mut buf, value), uvarint_len(value));
        }
    }

    #[test]
    fn read_ignores_trailing_bytes() {
        let mut buf = encode(300);
        buf.extend_from_slice(b"payload");
        assert_eq!(read_varint(&buf).unwrap(), (300, 2));
    }

    #[test]
    fn read_extremes() {
        assert_eq!(read_varint(&encode(i64::MAX)).unwrap(), (i64::MAX, 10));
        assert_eq!(read_varint(&encode(i64::MIN)).unwrap(), (i64::MIN, 10));
    }

    #[test]
    fn read_empty_is_incomplete() {
        assert_eq!(read_uvarint(&[]), Err(CodecError::Incomplete));
    }

    #[test]
    fn read_unterminated_is_incomplete() {
        assert_eq!(read_uvarint(&[0x80, 0x80]), Err(CodecError::Incomplete));
    }

    #[test]
    fn read_overflowing_tenth_byte() {
        let mut buf = vec![0xff; 9];
        buf.push(0x02);
        assert_eq!(read_uvarint(&buf), Err(CodecError::Overflow));
    }

    #[test]
    fn read_eleven_bytes_overflows() {
        let buf = [0x80u8; 11];
        assert_eq!(read_uvarint(&buf), Err(CodecError::Overflow));
    }

    #[test]
    fn ten_continuation_bytes_overflow() {
        let buf = [0x80u8; 10];
        assert_eq!(read_uvarint(&buf), Err(CodecError::Overflow));
    }

    #[test]
    fn nine_continuation_bytes_are_incomplete() {
        let buf = [0x80u8; 9];
        assert_eq!(read_uvarint(&buf), Err(CodecError::Incomplete));
    }
}
