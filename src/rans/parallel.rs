//! Chunked fork-join variant of the rANS codec.
//!
//! Input is split into fixed-size chunks, each compressed independently
//! on the rayon pool. The container is
//! `[total_orig_len:4][num_chunks:4]` followed by per-chunk
//! `(orig_size:4, comp_size:4)` pairs, then the chunk payloads in input
//! order. The fan-out is invisible to callers; both directions join
//! before returning.

use byteorder::{ByteOrder, LittleEndian};
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Default chunk size for parallel compression.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
/// Smallest allowed chunk size; smaller requests are clamped up.
pub const MIN_CHUNK_SIZE: usize = 4 * 1024;

/// Compress `data` in parallel chunks of `chunk_size` bytes.
pub fn compress_parallel(data: &[u8], chunk_size: usize) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(vec![0; 8]);
    }

    let chunk_size = chunk_size.max(MIN_CHUNK_SIZE);
    let chunks: Vec<&[u8]> = data.chunks(chunk_size).collect();

    let results: Vec<Result<Vec<u8>>> =
        chunks.par_iter().map(|chunk| super::compress(chunk)).collect();

    // Results arrive in input order; report the first error in that
    // order regardless of worker completion order.
    let mut compressed = Vec::with_capacity(results.len());
    for result in results {
        compressed.push(result?);
    }

    let header_size = 8 + chunks.len() * 8;
    let payload_size: usize = compressed.iter().map(Vec::len).sum();
    let mut output = Vec::with_capacity(header_size + payload_size);

    output.extend_from_slice(&(data.len() as u32).to_le_bytes());
    output.extend_from_slice(&(chunks.len() as u32).to_le_bytes());
    for (chunk, comp) in chunks.iter().zip(&compressed) {
        output.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        output.extend_from_slice(&(comp.len() as u32).to_le_bytes());
    }
    for comp in &compressed {
        output.extend_from_slice(comp);
    }

    Ok(output)
}

/// Decompress a parallel-chunked container.
pub fn decompress_parallel(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 8 {
        return Err(Error::TooShort);
    }

    let orig_len = LittleEndian::read_u32(&data[0..]) as usize;
    if orig_len == 0 {
        return Ok(Vec::new());
    }

    let num_chunks = LittleEndian::read_u32(&data[4..]) as usize;
    if data.len() < 8 + num_chunks * 8 {
        return Err(Error::TooShort);
    }

    let mut sizes = Vec::with_capacity(num_chunks);
    let mut pos = 8;
    for _ in 0..num_chunks {
        let orig_size = LittleEndian::read_u32(&data[pos..]) as usize;
        let comp_size = LittleEndian::read_u32(&data[pos + 4..]) as usize;
        sizes.push((orig_size, comp_size));
        pos += 8;
    }

    let mut payloads = Vec::with_capacity(num_chunks);
    for &(_, comp_size) in &sizes {
        let end = pos.checked_add(comp_size).ok_or(Error::Corrupted)?;
        if end > data.len() {
            return Err(Error::TooShort);
        }
        payloads.push(&data[pos..end]);
        pos = end;
    }

    let results: Vec<Result<Vec<u8>>> =
        payloads.par_iter().map(|chunk| super::decompress(chunk)).collect();

    let mut output = Vec::with_capacity(orig_len);
    for (result, &(orig_size, _)) in results.into_iter().zip(&sizes) {
        let chunk = result?;
        if chunk.len() != orig_size {
            return Err(Error::Corrupted);
        }
        output.extend_from_slice(&chunk);
    }

    if output.len() != orig_len {
        return Err(Error::Corrupted);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_empty() {
        let compressed = compress_parallel(&[], DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(decompress_parallel(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn roundtrip_single_chunk() {
        let data = b"chunk me".repeat(100);
        let compressed = compress_parallel(&data, DEFAULT_CHUNK_SIZE).unwrap();
        assert_eq!(decompress_parallel(&compressed).unwrap(), data);
    }

    #[test]
    fn roundtrip_many_chunks() {
        let data: Vec<u8> = (0..200_000).map(|i| (i % 251) as u8).collect();
        // Request below the minimum to exercise the clamp too.
        let compressed = compress_parallel(&data, 1024).unwrap();
        let num_chunks = LittleEndian::read_u32(&compressed[4..]);
        assert_eq!(num_chunks as usize, data.len().div_ceil(MIN_CHUNK_SIZE));
        assert_eq!(decompress_parallel(&compressed).unwrap(), data);
    }

    #[test]
    fn truncated_payload_errors() {
        let data = vec![7u8; 20_000];
        let mut compressed = compress_parallel(&data, MIN_CHUNK_SIZE).unwrap();
        compressed.truncate(compressed.len() - 10);
        assert!(decompress_parallel(&compressed).is_err());
    }

    #[test]
    fn truncated_header_errors() {
        assert!(matches!(
            decompress_parallel(&[1, 0, 0]),
            Err(Error::TooShort)
        ));
    }
}
