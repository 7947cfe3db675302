//! # recordlog codec
//!
//! Frame encoding for the recordlog file format.
//!
//! Every record on disk is a signed (zigzag) varint length prefix followed by
//! the raw payload. This crate knows nothing about files, cursors or
//! recovery; it only turns payloads into frames and prefixes back into
//! lengths.
//!
//! ## Usage
//!
//! ```
//! use recordlog_codec::{decode_header, encode_frame};
//!
//! let frame = encode_frame(b"block");
//! let header = decode_header(&frame).unwrap();
//! assert_eq!(header.payload_len, 5);
//! assert_eq!(&frame[header.prefix_len..], b"block");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod frame;
mod varint;

pub use error::{CodecError, CodecResult};
pub use frame::{decode_header, encode_frame, encoded_len, FrameHeader};
pub use varint::{
    put_uvarint, put_varint, read_uvarint, read_varint, uvarint_len, zigzag_decode, zigzag_encode,
    MAX_VARINT_LEN64,
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn varint_round_trips(value in any::<i64>()) {
            let mut buf = Vec::new();
            let written = put_varint(&mut buf, value);
            prop_assert_eq!(written, buf.len());
            prop_assert!(written <= MAX_VARINT_LEN64);
            prop_assert_eq!(read_varint(&buf).unwrap(), (value, written));
        }

        #[test]
        fn every_strict_prefix_is_incomplete(len in 0usize..100_000) {
            let mut buf = Vec::new();
            put_varint(&mut buf, len as i64);
            for cut in 0..buf.len() {
                prop_assert_eq!(decode_header(&buf[..cut]), Err(CodecError::Incomplete));
            }
        }
    }
}
