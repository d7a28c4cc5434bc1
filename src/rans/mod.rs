//! Entropy coding with rANS (range Asymmetric Numeral Systems).
//!
//! The coder keeps its entire state in a single `u32`, renormalizing a
//! byte at a time once the state outgrows its range. Symbols are encoded
//! in reverse so that decoding emits them in forward order.
//!
//! The single-shot container is `[orig_len:4][freqs:256×u16][stream]`,
//! all little-endian, where the stream starts with the 4-byte final
//! encoder state. A parallel chunked variant lives in [`parallel`].

mod parallel;

pub use parallel::{compress_parallel, decompress_parallel, DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Probability precision in bits.
pub const PROB_BITS: u32 = 14;
/// Probability scale: frequencies always sum to exactly this.
pub const PROB_SCALE: u32 = 1 << PROB_BITS;
/// Lower bound of the normalized state interval.
pub const RANS_L: u32 = 1 << 23;

/// Frequency information for one byte value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Symbol {
    /// Sum of the frequencies of all smaller byte values.
    pub cum_freq: u32,
    /// Normalized frequency of this byte value.
    pub freq: u32,
}

/// Encode/decode tables for one frequency distribution.
pub struct SymbolTable {
    symbols: [Symbol; 256],
    /// Reverse lookup from cumulative-frequency slot to owning symbol.
    cum_to_sym: Vec<u16>,
}

impl SymbolTable {
    /// Build a table from 256 raw byte counts.
    ///
    /// Non-zero counts are normalized to `floor(count·S/T)` clamped to at
    /// least 1, and the largest entry absorbs the rounding error so the
    /// total is exactly [`PROB_SCALE`]. A zero total assigns the whole
    /// scale to symbol 0 and leaves the lookup table zeroed, which is
    /// degenerate but decodes an empty stream correctly.
    pub fn build(counts: &[u32; 256]) -> Self {
        let mut table = Self {
            symbols: [Symbol::default(); 256],
            cum_to_sym: vec![0u16; PROB_SCALE as usize],
        };

        let total: u64 = counts.iter().map(|&c| u64::from(c)).sum();
        if total == 0 {
            table.symbols[0] = Symbol {
                cum_freq: 0,
                freq: PROB_SCALE,
            };
            return table;
        }

        let mut normalized = [0u32; 256];
        let mut norm_total: u32 = 0;
        for (i, &c) in counts.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let n = ((u64::from(c) * u64::from(PROB_SCALE)) / total) as u32;
            let n = n.max(1);
            normalized[i] = n;
            norm_total += n;
        }

        // The largest entry absorbs the rounding error.
        if norm_total != PROB_SCALE {
            let max_idx = (0..256).max_by_key(|&i| normalized[i]).unwrap_or(0);
            if norm_total > PROB_SCALE {
                normalized[max_idx] -= norm_total - PROB_SCALE;
            } else {
                normalized[max_idx] += PROB_SCALE - norm_total;
            }
        }

        let mut cum = 0u32;
        for (i, &n) in normalized.iter().enumerate() {
            table.symbols[i] = Symbol {
                cum_freq: cum,
                freq: n,
            };
            for slot in cum..cum + n {
                table.cum_to_sym[slot as usize] = i as u16;
            }
            cum += n;
        }

        table
    }

    /// Frequency info for a byte value.
    pub fn symbol(&self, sym: u8) -> Symbol {
        self.symbols[usize::from(sym)]
    }
}

/// Streaming rANS encoder.
///
/// Feed symbols in *reverse* source order, then call [`finish`] to
/// produce the byte stream.
///
/// [`finish`]: RansEncoder::finish
pub struct RansEncoder {
    state: u32,
    output: Vec<u8>,
}

impl RansEncoder {
    pub fn new() -> Self {
        Self {
            state: RANS_L,
            output: Vec::new(),
        }
    }

    /// Encode a single symbol.
    pub fn encode(&mut self, sym: u8, table: &SymbolTable) {
        let s = table.symbol(sym);
        if s.freq == 0 {
            return;
        }

        // Renormalize: shift bytes out until the state fits the update.
        let max_state = ((RANS_L >> PROB_BITS) << 8) * s.freq;
        while self.state >= max_state {
            self.output.push(self.state as u8);
            self.state >>= 8;
        }

        self.state = ((self.state / s.freq) << PROB_BITS) + s.cum_freq + (self.state % s.freq);
    }

    /// Finalize and return `[state:4][bytes in decode order…]`.
    pub fn finish(mut self) -> Vec<u8> {
        self.output.reverse();

        let mut result = Vec::with_capacity(4 + self.output.len());
        result.extend_from_slice(&self.state.to_le_bytes());
        result.extend_from_slice(&self.output);
        result
    }
}

impl Default for RansEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Streaming rANS decoder over a finished encoder stream.
pub struct RansDecoder<'a> {
    state: u32,
    data: &'a [u8],
    pos: usize,
}

impl<'a> RansDecoder<'a> {
    /// Initialize from a stream; needs at least the 4-byte state prefix.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::TooShort);
        }
        Ok(Self {
            state: LittleEndian::read_u32(&data[..4]),
            data,
            pos: 4,
        })
    }

    /// Decode one symbol and renormalize.
    pub fn decode(&mut self, table: &SymbolTable) -> u8 {
        let slot = self.state & (PROB_SCALE - 1);
        let sym = table.cum_to_sym[slot as usize];
        let s = table.symbol(sym as u8);

        self.state = s.freq * (self.state >> PROB_BITS) + slot - s.cum_freq;

        while self.state < RANS_L && self.pos < self.data.len() {
            self.state = (self.state << 8) | u32::from(self.data[self.pos]);
            self.pos += 1;
        }

        sym as u8
    }
}

/// Compress `data` into the single-shot rANS container.
///
/// Empty input produces the distinguished 4-zero-byte sentinel.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(vec![0, 0, 0, 0]);
    }

    let mut counts = [0u32; 256];
    for &b in data {
        counts[usize::from(b)] += 1;
    }
    let table = SymbolTable::build(&counts);

    // Encode in reverse so the decoder emits forward.
    let mut encoder = RansEncoder::new();
    for &b in data.iter().rev() {
        encoder.encode(b, &table);
    }
    let stream = encoder.finish();

    let mut output = Vec::with_capacity(4 + 512 + stream.len());
    output.extend_from_slice(&(data.len() as u32).to_le_bytes());
    for sym in table.symbols.iter() {
        output.extend_from_slice(&(sym.freq as u16).to_le_bytes());
    }
    output.extend_from_slice(&stream);
    Ok(output)
}

/// Decompress a single-shot rANS container.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 4 {
        return Err(Error::TooShort);
    }

    let orig_len = LittleEndian::read_u32(&data[..4]) as usize;
    if orig_len == 0 {
        return Ok(Vec::new());
    }

    if data.len() < 4 + 512 + 4 {
        return Err(Error::TooShort);
    }

    // Rebuild the table from the stored normalized frequencies. They
    // already sum to the scale, so normalization is the identity.
    let mut counts = [0u32; 256];
    let mut total = 0u64;
    for (i, count) in counts.iter_mut().enumerate() {
        let freq = u32::from(LittleEndian::read_u16(&data[4 + i * 2..]));
        *count = freq;
        total += u64::from(freq);
    }
    if total == 0 {
        return Err(Error::Corrupted);
    }
    let table = SymbolTable::build(&counts);

    let mut decoder = RansDecoder::new(&data[4 + 512..])?;
    let mut output = Vec::with_capacity(orig_len);
    for _ in 0..orig_len {
        output.push(decoder.decode(&table));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_empty() {
        let compressed = compress(&[]).unwrap();
        assert_eq!(compressed, vec![0, 0, 0, 0]);
        assert_eq!(decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn roundtrip_single_byte() {
        let compressed = compress(&[0x42]).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), vec![0x42]);
    }

    #[test]
    fn roundtrip_uniform() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        assert_eq!(decompress(&compress(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn roundtrip_skewed() {
        let mut data = vec![b'a'; 5000];
        data.extend_from_slice(&[b'b'; 100]);
        data.push(b'c');
        let compressed = compress(&data).unwrap();
        // Heavily skewed input compresses well below the header overhead.
        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn roundtrip_text() {
        let data = b"It was the best of times, it was the worst of times.".repeat(40);
        assert_eq!(decompress(&compress(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn truncated_input_errors() {
        assert!(matches!(decompress(&[1, 0]), Err(Error::TooShort)));
        // Claims one symbol but carries no table or stream.
        assert!(matches!(decompress(&[1, 0, 0, 0]), Err(Error::TooShort)));
    }

    #[test]
    fn zeroed_table_is_corrupted() {
        let mut data = vec![0u8; 4 + 512 + 4];
        data[0] = 1; // orig_len = 1 with an all-zero frequency table
        assert!(matches!(decompress(&data), Err(Error::Corrupted)));
    }

    #[test]
    fn table_invariants() {
        let mut counts = [0u32; 256];
        counts[b'x' as usize] = 7;
        counts[b'y' as usize] = 3;
        counts[0xFF] = 1;
        let table = SymbolTable::build(&counts);

        let total: u32 = (0..=255u8).map(|s| table.symbol(s).freq).sum();
        assert_eq!(total, PROB_SCALE);
        assert!(table.symbol(b'x').freq >= 1);
        assert!(table.symbol(0xFF).freq >= 1);
        assert_eq!(table.symbol(b'z').freq, 0);
    }
}
