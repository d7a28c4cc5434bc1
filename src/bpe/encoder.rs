//! Greedy longest-match BPE encoding.

use super::SharedVocabulary;

/// Tokenizes byte strings against a shared vocabulary.
///
/// The encoder is cheap to construct (it only holds a vocabulary
/// handle); callers allocate one per operation or per worker rather than
/// sharing a single instance across concurrent operations.
#[derive(Debug, Clone)]
pub struct Encoder {
    vocab: SharedVocabulary,
}

impl Encoder {
    /// Create an encoder over the given vocabulary.
    pub fn new(vocab: SharedVocabulary) -> Self {
        Self { vocab }
    }

    /// Tokenize `text` with greedy, non-backtracking longest-match.
    ///
    /// At each position the longest matching token wins and the cursor
    /// advances by its length. Worst case O(n · max_token_len), O(n)
    /// amortized on realistic input.
    pub fn encode(&self, text: &[u8]) -> Vec<u32> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(text.len() / 4 + 1);
        let mut pos = 0;

        while pos < text.len() {
            let (len, id) = self.vocab.longest_match(&text[pos..]);
            match id {
                Some(id) if len > 0 => {
                    out.push(id);
                    pos += len;
                }
                _ => {
                    // No match: fall back to the single-byte token. With
                    // all 256 byte tokens present this branch is dead,
                    // but a pathological vocabulary must not loop.
                    let id = self
                        .vocab
                        .id_of(&text[pos..pos + 1])
                        .unwrap_or(u32::from(text[pos]));
                    out.push(id);
                    pos += 1;
                }
            }
        }

        out
    }

    /// Expand token ids back into bytes.
    pub fn decode(&self, ids: &[u32]) -> Vec<u8> {
        self.vocab.decode(ids)
    }

    /// The underlying vocabulary.
    pub fn vocabulary(&self) -> &SharedVocabulary {
        &self.vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpe::Vocabulary;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn encoder_with_merges(merges: &[&[u8]]) -> Encoder {
        let mut ranks = HashMap::new();
        for b in 0..=255u8 {
            ranks.insert(vec![b], u32::from(b));
        }
        for (i, m) in merges.iter().enumerate() {
            ranks.insert(m.to_vec(), 256 + i as u32);
        }
        Encoder::new(Arc::new(Vocabulary::from_ranks(ranks)))
    }

    #[test]
    fn encode_prefers_longest() {
        let enc = encoder_with_merges(&[b"th", b"the", b"the "]);
        let ids = enc.encode(b"the theme");
        // "the " + "the" + "m" + "e"
        assert_eq!(ids, vec![258, 257, u32::from(b'm'), u32::from(b'e')]);
    }

    #[test]
    fn roundtrip_arbitrary_bytes() {
        let enc = encoder_with_merges(&[b"ab", b"abc", b"\x00\x01"]);
        let inputs: Vec<Vec<u8>> = vec![
            vec![],
            vec![0x42],
            b"abcabcab".to_vec(),
            (0..=255u8).collect(),
            vec![0x00, 0x01, 0x00, 0x01, 0xFF],
        ];
        for input in inputs {
            assert_eq!(enc.decode(&enc.encode(&input)), input);
        }
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        let enc = encoder_with_merges(&[]);
        assert!(enc.encode(b"").is_empty());
    }

    #[test]
    fn merges_shrink_token_count() {
        let enc = encoder_with_merges(&[b"ab", b"abab"]);
        assert_eq!(enc.encode(b"abababab").len(), 2);
    }
}
