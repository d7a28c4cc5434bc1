//! Raw DEFLATE compression (ZIP method 8).
//!
//! ZIP carries raw DEFLATE streams with no zlib or gzip framing, so this
//! wraps flate2's `Deflate` codecs directly at best compression.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{Error, Result};

/// Compress `data` as a raw DEFLATE stream at best compression.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).map_err(|_| Error::Corrupted)?;
    encoder.finish().map_err(|_| Error::Corrupted)
}

/// Decompress a raw DEFLATE stream.
///
/// Any malformed input is reported as [`Error::Corrupted`]; no partial
/// output is returned.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|_| Error::Corrupted)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(10);
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn roundtrip_empty() {
        let compressed = compress(&[]).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn garbage_is_corrupted() {
        assert!(matches!(
            decompress(&[0xFF, 0xFE, 0xFD, 0x00, 0x12]),
            Err(Error::Corrupted)
        ));
    }
}
