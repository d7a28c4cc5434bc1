//! Byte Pair Encoding tokenization for the compression pipeline.
//!
//! A [`Vocabulary`] holds a fixed token set indexed both by byte string
//! and by a trie for longest-prefix matching. The [`Encoder`] walks input
//! greedily, always taking the longest token that matches at the current
//! position. Because every vocabulary contains all 256 single-byte
//! tokens, encoding never fails and `decode(encode(x)) == x` for any
//! input.

mod encoder;
mod train;
mod trie;

pub use encoder::Encoder;
pub use train::train;

use std::collections::HashMap;
use std::sync::Arc;

use trie::ByteTrie;

/// A single vocabulary entry: its raw bytes and its merge rank.
///
/// Lower ranks were merged earlier during training and carry higher
/// priority. Token ids are assigned in ascending rank order.
#[derive(Debug, Clone)]
pub struct Token {
    /// The byte string this token expands to.
    pub bytes: Vec<u8>,
    /// Priority rank (lower = merged earlier).
    pub rank: u32,
}

/// An immutable BPE vocabulary.
///
/// Built once from a byte-string → rank table and never mutated
/// afterwards; shared between concurrent operations behind an [`Arc`].
pub struct Vocabulary {
    tokens: Vec<Token>,
    byte_to_id: HashMap<Vec<u8>, u32>,
    trie: ByteTrie,
    max_len: usize,
}

impl Vocabulary {
    /// Build a vocabulary from a byte-string → rank mapping.
    ///
    /// Tokens are sorted by ascending rank and assigned dense ids in that
    /// order; the trie index and maximum token length are derived here.
    pub fn from_ranks(ranks: HashMap<Vec<u8>, u32>) -> Self {
        let mut sorted: Vec<(Vec<u8>, u32)> = ranks.into_iter().collect();
        sorted.sort_by_key(|&(_, rank)| rank);

        let mut tokens = Vec::with_capacity(sorted.len());
        let mut byte_to_id = HashMap::with_capacity(sorted.len());
        let mut trie = ByteTrie::new();
        let mut max_len = 0;

        for (id, (bytes, rank)) in sorted.into_iter().enumerate() {
            let id = id as u32;
            byte_to_id.insert(bytes.clone(), id);
            trie.insert(&bytes, id);
            max_len = max_len.max(bytes.len());
            tokens.push(Token { bytes, rank });
        }

        Self {
            tokens,
            byte_to_id,
            trie,
            max_len,
        }
    }

    /// Number of tokens in the vocabulary.
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    /// Length in bytes of the longest token.
    pub fn max_token_len(&self) -> usize {
        self.max_len
    }

    /// Look up a token by id.
    pub fn token(&self, id: u32) -> Option<&Token> {
        self.tokens.get(id as usize)
    }

    /// Look up the id for an exact byte string.
    pub fn id_of(&self, bytes: &[u8]) -> Option<u32> {
        self.byte_to_id.get(bytes).copied()
    }

    /// Longest token matching a prefix of `text`.
    ///
    /// Returns `(length, id)`, or `(0, None)` when nothing matches. With
    /// the single-byte tokens present the second case cannot occur.
    pub fn longest_match(&self, text: &[u8]) -> (usize, Option<u32>) {
        self.trie.longest_match(text)
    }

    /// Concatenate the byte strings of `ids` in order.
    ///
    /// Ids outside the vocabulary are skipped; a decoder built from the
    /// vocabulary that produced the stream never encounters them.
    pub fn decode(&self, ids: &[u32]) -> Vec<u8> {
        let total: usize = ids
            .iter()
            .filter_map(|&id| self.token(id))
            .map(|t| t.bytes.len())
            .sum();

        let mut out = Vec::with_capacity(total);
        for &id in ids {
            if let Some(token) = self.token(id) {
                out.extend_from_slice(&token.bytes);
            }
        }
        out
    }

    /// A byte-only vocabulary: 256 single-byte tokens, no merges.
    pub fn basic() -> Self {
        let mut ranks = HashMap::with_capacity(256);
        for b in 0..=255u8 {
            ranks.insert(vec![b], u32::from(b));
        }
        Self::from_ranks(ranks)
    }
}

impl std::fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vocabulary")
            .field("size", &self.tokens.len())
            .field("max_len", &self.max_len)
            .finish()
    }
}

/// Shared handle to an immutable vocabulary.
pub type SharedVocabulary = Arc<Vocabulary>;

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vocab() -> Vocabulary {
        let mut ranks = HashMap::new();
        for b in 0..=255u8 {
            ranks.insert(vec![b], u32::from(b));
        }
        ranks.insert(b"th".to_vec(), 256);
        ranks.insert(b"he".to_vec(), 257);
        ranks.insert(b"the".to_vec(), 258);
        ranks.insert(b"the ".to_vec(), 259);
        Vocabulary::from_ranks(ranks)
    }

    #[test]
    fn ids_follow_rank_order() {
        let v = test_vocab();
        assert_eq!(v.size(), 260);
        assert_eq!(v.id_of(b"th"), Some(256));
        assert_eq!(v.id_of(b"the "), Some(259));
        assert_eq!(v.token(256).unwrap().bytes, b"th");
    }

    #[test]
    fn max_token_len() {
        assert_eq!(test_vocab().max_token_len(), 4);
        assert_eq!(Vocabulary::basic().max_token_len(), 1);
    }

    #[test]
    fn longest_match_prefers_longer() {
        let v = test_vocab();
        let (len, id) = v.longest_match(b"the quick");
        assert_eq!(len, 4);
        assert_eq!(id, Some(259));

        let (len, id) = v.longest_match(b"then");
        assert_eq!(len, 3);
        assert_eq!(id, Some(258));

        let (len, id) = v.longest_match(b"xyz");
        assert_eq!(len, 1);
        assert_eq!(id, Some(u32::from(b'x')));
    }

    #[test]
    fn decode_skips_out_of_range() {
        let v = test_vocab();
        assert_eq!(v.decode(&[256, 9999, 257]), b"thhe");
    }
}
