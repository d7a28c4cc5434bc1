//! Pre-trained BPE vocabularies and their process-wide registry.
//!
//! Vocabularies are built once, on first use, behind one-shot
//! initializers, then shared by reference for the life of the process.
//! Nothing mutates them after construction, so they are safe to use from
//! concurrent archive operations without locking.

mod data;

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::bpe::{SharedVocabulary, Vocabulary};

/// A vocabulary selector: natural-language text or a programming
/// language with a dedicated merge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Natural-language text (the default vocabulary).
    Text,
    /// Go source code.
    Go,
    /// Python source code.
    Python,
    /// JavaScript or TypeScript source code.
    JavaScript,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Language::Text => "Text",
            Language::Go => "Go",
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
        };
        f.write_str(name)
    }
}

static TEXT_VOCAB: OnceCell<SharedVocabulary> = OnceCell::new();
static GO_VOCAB: OnceCell<SharedVocabulary> = OnceCell::new();
static PYTHON_VOCAB: OnceCell<SharedVocabulary> = OnceCell::new();
static JS_VOCAB: OnceCell<SharedVocabulary> = OnceCell::new();

/// The default vocabulary for natural-language text.
pub fn default() -> SharedVocabulary {
    Arc::clone(TEXT_VOCAB.get_or_init(|| build(data::TEXT_MERGES)))
}

/// The vocabulary for the given language.
pub fn for_language(lang: Language) -> SharedVocabulary {
    match lang {
        Language::Text => default(),
        Language::Go => Arc::clone(GO_VOCAB.get_or_init(|| build(data::GO_MERGES))),
        Language::Python => Arc::clone(PYTHON_VOCAB.get_or_init(|| build(data::PYTHON_MERGES))),
        Language::JavaScript => Arc::clone(JS_VOCAB.get_or_init(|| build(data::JS_MERGES))),
    }
}

/// Assemble a vocabulary from the 256 byte tokens plus a merge table.
fn build(merges: &[&str]) -> SharedVocabulary {
    let mut ranks = HashMap::with_capacity(256 + merges.len());
    for b in 0..=255u8 {
        ranks.insert(vec![b], u32::from(b));
    }
    for (i, merge) in merges.iter().enumerate() {
        // Later duplicates would shadow earlier ranks; the tables are
        // deduplicated, so entry() keeps this strictly additive.
        ranks
            .entry(merge.as_bytes().to_vec())
            .or_insert(256 + i as u32);
    }
    Arc::new(Vocabulary::from_ranks(ranks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpe::Encoder;

    #[test]
    fn registry_returns_shared_instances() {
        let a = default();
        let b = default();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(
            &for_language(Language::Go),
            &for_language(Language::Go)
        ));
    }

    #[test]
    fn all_vocabularies_contain_byte_tokens() {
        for lang in [
            Language::Text,
            Language::Go,
            Language::Python,
            Language::JavaScript,
        ] {
            let vocab = for_language(lang);
            assert!(vocab.size() >= 256, "{lang} vocabulary too small");
            for b in 0..=255u8 {
                assert!(vocab.id_of(&[b]).is_some(), "{lang} missing byte {b:#x}");
            }
        }
    }

    #[test]
    fn every_vocabulary_roundtrips_binary_input() {
        let input: Vec<u8> = (0..=255u8).rev().collect();
        for lang in [
            Language::Text,
            Language::Go,
            Language::Python,
            Language::JavaScript,
        ] {
            let enc = Encoder::new(for_language(lang));
            assert_eq!(enc.decode(&enc.encode(&input)), input);
        }
    }

    #[test]
    fn go_vocabulary_compacts_go_source() {
        let source = b"func main() {\n\tif err != nil {\n\t\treturn err\n\t}\n}\n";
        let enc = Encoder::new(for_language(Language::Go));
        let ids = enc.encode(source);
        assert!(ids.len() < source.len() / 2);
        assert_eq!(enc.decode(&ids), source);
    }
}
