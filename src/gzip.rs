//! Gzip wrapping of stored streams.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::Result;

/// Check for the gzip magic bytes.
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Decompress `data` if it is gzip compressed, otherwise return it as is.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !is_gzip(data) {
        return Ok(data.to_vec());
    }
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| crate::Error::Config(format!("Gzip decompression failed: {}", e)))?;
    Ok(out)
}

/// Gzip compress `data` with the default level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
