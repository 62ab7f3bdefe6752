//! Little-endian base-128 varints (LEB128).

use crate::{Error, Result};

/// Longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` as a varint, returning the number of bytes written.
pub fn write_varint(mut value: u64, out: &mut Vec<u8>) -> usize {
    let mut written = 0;
    loop {
        let mut digit = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            digit |= 0x80;
        }
        out.push(digit);
        written += 1;
        if value == 0 {
            return written;
        }
    }
}

/// Read a varint at the start of `data`, returning `(value, bytes used)`.
///
/// Returns `Ok(None)` when `data` ends before the varint does.
pub fn read_varint(data: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().enumerate() {
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(Error::VarintOverflow);
        }
        value |= ((byte & 0x7F) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
        if i + 1 == MAX_VARINT_LEN {
            return Err(Error::VarintOverflow);
        }
    }
    Ok(None)
}
