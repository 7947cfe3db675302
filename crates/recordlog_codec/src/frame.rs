//! Record framing.
//!
//! A frame is a zigzag varint holding the payload length followed by the
//! payload bytes:
//!
//! ```text
//! | varint-zigzag(len) (1..=10) | payload (len) |
//! ```
//!
//! There is no header, magic, checksum or version. A log file is nothing but
//! consecutive frames.

use crate::error::{CodecError, CodecResult};
use crate::varint::{put_varint, read_varint, uvarint_len, zigzag_encode, MAX_VARINT_LEN64};

/// Decoded length prefix of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Payload length in bytes.
    pub payload_len: u64,
    /// Width of the encoded prefix in bytes.
    pub prefix_len: usize,
}

impl FrameHeader {
    /// Total size of the frame on disk.
    #[must_use]
    pub const fn frame_len(&self) -> u64 {
        self.prefix_len as u64 + self.payload_len
    }
}

/// Decodes the length prefix at the start of `bytes`.
///
/// `bytes` may extend past the prefix (readers usually grab
/// [`MAX_VARINT_LEN64`] bytes speculatively); [`FrameHeader::prefix_len`]
/// tells how many were actually consumed.
///
/// # Errors
///
/// - [`CodecError::Incomplete`] if `bytes` stops inside the prefix
/// - [`CodecError::Overflow`] if the prefix is not a valid 64-bit varint
/// - [`CodecError::NegativeLength`] if the prefix decodes below zero
pub fn decode_header(bytes: &[u8]) -> CodecResult<FrameHeader> {
    let (len, prefix_len) = read_varint(bytes)?;
    let payload_len = u64::try_from(len).map_err(|_| CodecError::NegativeLength(len))?;
    Ok(FrameHeader {
        payload_len,
        prefix_len,
    })
}

/// Size of the frame that [`encode_frame`] would produce for `payload_len`.
#[must_use]
pub fn encoded_len(payload_len: usize) -> usize {
    uvarint_len(zigzag_encode(payload_len as i64)) + payload_len
}

/// Encodes `payload` as a single frame.
#[must_use]
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(MAX_VARINT_LEN64 + payload.len());
    // Slice lengths never exceed isize::MAX, so the cast is lossless.
    put_varint(&mut frame, payload.len() as i64);
    frame.extend_from_slice(payload);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_one_byte() {
        assert_eq!(encode_frame(b""), vec![0x00]);
        assert_eq!(encoded_len(0), 1);
    }

    #[test]
    fn frame_layout() {
        let frame = encode_frame(b"hello");
        assert_eq!(frame[0], 0x0a);
        assert_eq!(&frame[1..], b"hello");
    }

    #[test]
    fn header_of_encoded_frame() {
        let payload = vec![7u8; 300];
        let frame = encode_frame(&payload);
        let header = decode_header(&frame).unwrap();
        assert_eq!(header.payload_len, 300);
        assert_eq!(header.prefix_len, 2);
        assert_eq!(header.frame_len(), frame.len() as u64);
        assert_eq!(encoded_len(payload.len()), frame.len());
    }

    #[test]
    fn negative_length_rejected() {
        // zigzag(-1) == 1
        assert_eq!(decode_header(&[0x01]), Err(CodecError::NegativeLength(-1)));
        assert_eq!(decode_header(&[0x03, 0xaa]), Err(CodecError::NegativeLength(-2)));
    }

    #[test]
    fn truncated_prefix_is_incomplete() {
        let frame = encode_frame(&vec![0u8; 20_000]);
        assert_eq!(decode_header(&frame[..1]), Err(CodecError::Incomplete));
        assert!(decode_header(&frame[..2]).unwrap_err().is_incomplete());
    }
}
