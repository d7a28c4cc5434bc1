//! Offline BPE vocabulary training.

use std::collections::HashMap;

use super::Vocabulary;

/// Train a BPE vocabulary on `text`, performing up to `num_merges`
/// merges.
///
/// Standard BPE: start from the 256 single-byte tokens, repeatedly find
/// the most frequent adjacent token pair, mint a new token for the
/// concatenation at the next rank, and rewrite the sequence. Stops early
/// when the best pair occurs fewer than twice. Ties between equally
/// frequent pairs are broken arbitrarily.
///
/// This runs offline in the vocabulary-builder tooling; it is never on
/// the compression hot path.
pub fn train(text: &[u8], num_merges: usize) -> Vocabulary {
    // Token bytes indexed by id; ids 0..=255 are the byte tokens.
    let mut token_bytes: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();

    let mut ids: Vec<u32> = text.iter().map(|&b| u32::from(b)).collect();

    log::debug!("training BPE: {} bytes, up to {} merges", text.len(), num_merges);

    for merge in 0..num_merges {
        let mut pair_counts: HashMap<(u32, u32), u32> = HashMap::new();
        for pair in ids.windows(2) {
            *pair_counts.entry((pair[0], pair[1])).or_default() += 1;
        }

        let Some((&best_pair, &best_count)) =
            pair_counts.iter().max_by_key(|&(_, &count)| count)
        else {
            break;
        };

        if best_count < 2 {
            log::debug!("stopping after {merge} merges: best pair count {best_count}");
            break;
        }

        let (a, b) = best_pair;
        let mut bytes = token_bytes[a as usize].clone();
        bytes.extend_from_slice(&token_bytes[b as usize]);
        let new_id = token_bytes.len() as u32;
        token_bytes.push(bytes);

        // Rewrite the sequence, collapsing every occurrence of the pair.
        let mut merged = Vec::with_capacity(ids.len());
        let mut i = 0;
        while i < ids.len() {
            if i + 1 < ids.len() && ids[i] == a && ids[i + 1] == b {
                merged.push(new_id);
                i += 2;
            } else {
                merged.push(ids[i]);
                i += 1;
            }
        }
        ids = merged;
    }

    log::info!("trained vocabulary: {} tokens", token_bytes.len());

    let ranks = token_bytes
        .into_iter()
        .enumerate()
        .map(|(rank, bytes)| (bytes, rank as u32))
        .collect();
    Vocabulary::from_ranks(ranks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpe::Encoder;
    use std::sync::Arc;

    #[test]
    fn empty_text_keeps_byte_tokens_only() {
        let v = train(b"", 10);
        assert_eq!(v.size(), 256);
    }

    #[test]
    fn merge_count_is_bounded() {
        let v = train(b"abababababab", 5);
        // At most 256 + 5 tokens, and every merge performed at least
        // twice in the corpus.
        assert!(v.size() <= 256 + 5);
        assert!(v.size() > 256);
    }

    #[test]
    fn stops_when_no_pair_repeats() {
        // All adjacent pairs are distinct, so no merge is worth making.
        let v = train(b"abcdefgh", 100);
        assert_eq!(v.size(), 256);
    }

    #[test]
    fn trained_vocab_roundtrips() {
        let corpus = b"the cat sat on the mat, the cat sat on the hat";
        let v = Arc::new(train(corpus, 20));
        let enc = Encoder::new(v);
        assert_eq!(enc.decode(&enc.encode(corpus)), corpus);
        // Merges must pay off on the training corpus itself.
        assert!(enc.encode(corpus).len() < corpus.len());
    }
}
