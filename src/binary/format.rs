//! BILL format constants and field encodings.
//!
//! A node is encoded as:
//!
//! ```text
//! [children header]  2 bytes, only when the node has children
//!                    0b1lll_llll 0bllll_llll  (15-bit length of what follows)
//! name               0b00ii_iiii                  dictionary index
//!                    0b01nn_nnnn nnnn_nnnn name   14-bit length + bytes
//! span               0b0sss_llll                  3-bit skip, 4-bit length
//!                    0b10ss_ssss llll_llll        6-bit skip, 8-bit length
//!                    0b11ss_ssss ssss_ssss llll_llll llll_llll
//!                                                 14-bit skip, 16-bit length (LE)
//! [children]         each child encoded the same way
//! ```
//!
//! `skip` is the distance from the end of the previous sibling (or the start
//! of the parent for a first child) to the start of the node.

use crate::{Error, Result};

/// Stream header: magic followed by a 2-byte version.
pub const HEADER: [u8; 6] = *b"BILL\x00\x01";

/// Magic bytes.
pub const MAGIC: [u8; 4] = *b"BILL";

/// Current format version.
pub const FORMAT_VERSION: u16 = 1;

/// Varint value marking the end of a stream.
pub const TERMINATOR: u64 = u64::MAX;

/// Dictionary size used by streams (6 encodable index bits).
pub const DICTIONARY_SIZE: u16 = 64;

/// Largest encodable name length (14 bits).
pub const MAX_NAME_LEN: usize = 0x3FFF;

/// Largest encodable children block (15 bits).
pub const MAX_CHILDREN_LEN: usize = 0x7FFF;

/// Largest encodable skip (14 bits).
pub const MAX_SKIP: usize = 0x3FFF;

/// Largest encodable span length (16 bits).
pub const MAX_SPAN_LEN: usize = 0xFFFF;

/// Deepest node nesting written or accepted; the root is at depth 0.
pub const MAX_DEPTH: usize = 512;

pub(crate) const CHILDREN_FLAG: u8 = 0b1000_0000;
pub(crate) const NAME_TAG_MASK: u8 = 0b1100_0000;
pub(crate) const NAME_TAG_INDEX: u8 = 0b0000_0000;
pub(crate) const NAME_TAG_FULL: u8 = 0b0100_0000;
pub(crate) const SPAN_TAG_SHORT: u8 = 0b1000_0000;
pub(crate) const SPAN_TAG_LONG: u8 = 0b1100_0000;
pub(crate) const LOW6: u8 = 0b0011_1111;
pub(crate) const LOW7: u8 = 0b0111_1111;

/// Append a span, picking the smallest of the three widths.
///
/// Returns the number of bytes written.
pub fn encode_span(skip: usize, length: usize, out: &mut Vec<u8>) -> Result<usize> {
    if skip <= 0b0111 && length <= 0b1111 {
        out.push(((skip << 4) | length) as u8);
        Ok(1)
    } else if skip <= LOW6 as usize && length <= 0xFF {
        out.push(SPAN_TAG_SHORT | skip as u8);
        out.push(length as u8);
        Ok(2)
    } else if skip <= MAX_SKIP && length <= MAX_SPAN_LEN {
        out.push(SPAN_TAG_LONG | (skip as u8 & LOW6));
        out.push((skip >> 6) as u8);
        out.push((length & 0xFF) as u8);
        out.push((length >> 8) as u8);
        Ok(4)
    } else {
        Err(Error::SpanOverflow { skip, length })
    }
}

/// Decode a span at the start of `data`, returning `(skip, length, bytes used)`.
pub fn decode_span(data: &[u8]) -> Option<(usize, usize, usize)> {
    let first = *data.first()?;
    if first & 0b1000_0000 == 0 {
        Some((((first >> 4) & 0b0111) as usize, (first & 0b1111) as usize, 1))
    } else if first & NAME_TAG_MASK == SPAN_TAG_SHORT {
        let length = *data.get(1)?;
        Some(((first & LOW6) as usize, length as usize, 2))
    } else {
        let bytes = data.get(1..4)?;
        let skip = (first & LOW6) as usize | (bytes[0] as usize) << 6;
        let length = bytes[1] as usize | (bytes[2] as usize) << 8;
        Some((skip, length, 4))
    }
}

/// Append a fully spelled-out name.
pub fn encode_full_name(name: &str, out: &mut Vec<u8>) -> Result<()> {
    let len = name.len();
    if len > MAX_NAME_LEN {
        return Err(Error::NameTooLong(len));
    }
    out.push(NAME_TAG_FULL | (len as u8 & LOW6));
    out.push((len >> 6) as u8);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

/// Write the children header for a block of `length` bytes at `at`.
pub(crate) fn patch_children_header(out: &mut [u8], at: usize, length: usize) -> Result<()> {
    if length > MAX_CHILDREN_LEN {
        return Err(Error::ChildrenBlockTooLarge(length));
    }
    out[at] = CHILDREN_FLAG | (length as u8 & LOW7);
    out[at + 1] = (length >> 7) as u8;
    Ok(())
}

/// Validate a stream header.
pub fn validate_header(data: &[u8]) -> Result<()> {
    if data.len() < HEADER.len() {
        return Err(Error::Truncated { offset: data.len() });
    }
    if data[..MAGIC.len()] != MAGIC {
        return Err(Error::InvalidMagic);
    }
    let version = u16::from_be_bytes([data[4], data[5]]);
    if version != FORMAT_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(skip: usize, length: usize) -> Vec<u8> {
        let mut out = Vec::new();
        encode_span(skip, length, &mut out).unwrap();
        out
    }

    #[test]
    fn test_span_widths() {
        assert_eq!(span(0, 5), vec![0x05]);
        assert_eq!(span(7, 15), vec![0x7F]);
        assert_eq!(span(10, 5), vec![0x8A, 0x05]);
        assert_eq!(span(0, 16), vec![0x80, 0x10]);
        assert_eq!(span(100, 5), vec![0xC0 | (100 & 0x3F), 1, 5, 0]);
        assert_eq!(span(0, 300), vec![0xC0, 0, 0x2C, 0x01]);
    }

    #[test]
    fn test_span_overflow() {
        let mut out = Vec::new();
        assert!(matches!(
            encode_span(MAX_SKIP + 1, 0, &mut out),
            Err(Error::SpanOverflow { .. })
        ));
        assert!(encode_span(0, MAX_SPAN_LEN + 1, &mut out).is_err());
        assert!(out.is_empty());
        assert_eq!(encode_span(MAX_SKIP, MAX_SPAN_LEN, &mut out).unwrap(), 4);
    }

    #[test]
    fn test_decode_span() {
        for (skip, length) in [(0, 0), (3, 9), (40, 200), (5000, 60000)] {
            let bytes = span(skip, length);
            assert_eq!(decode_span(&bytes), Some((skip, length, bytes.len())));
        }
        assert_eq!(decode_span(&[0x80]), None);
        assert_eq!(decode_span(&[]), None);
    }

    #[test]
    fn test_full_name() {
        let mut out = Vec::new();
        encode_full_name("ip", &mut out).unwrap();
        assert_eq!(out, vec![0x42, 0x00, b'i', b'p']);

        let long = "a".repeat(100);
        out.clear();
        encode_full_name(&long, &mut out).unwrap();
        assert_eq!(&out[..2], &[0x40 | (100 & 0x3F), 1]);

        assert!(matches!(
            encode_full_name(&"a".repeat(MAX_NAME_LEN + 1), &mut out),
            Err(Error::NameTooLong(_))
        ));
    }

    #[test]
    fn test_header_validation() {
        assert!(validate_header(&HEADER).is_ok());
        assert!(matches!(validate_header(b"BIL"), Err(Error::Truncated { .. })));
        assert!(matches!(validate_header(b"LLIB\x00\x01"), Err(Error::InvalidMagic)));
        assert!(matches!(
            validate_header(b"BILL\x00\x02"),
            Err(Error::UnsupportedVersion(2))
        ));
    }
}
