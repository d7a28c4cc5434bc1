//! Content detection for compression-method selection.
//!
//! [`detect`] examines the first 8 KiB of an input and produces a
//! [`Profile`]: byte-level statistics (entropy, ASCII ratio, repetition,
//! code likelihood) plus a coarse classification and optional
//! sub-classifications (programming language, structured data format,
//! markup, natural language). The profile is a pure function of the
//! sampled bytes; the orchestrator dispatches on it.

mod code;
mod format;
mod natural;

pub use code::CodeLang;
pub use format::{DataFormat, MarkupLang};
pub use natural::NatLang;

use std::collections::HashMap;

/// Maximum number of bytes examined per input.
const SAMPLE_SIZE: usize = 8192;

/// Coarse classification of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Natural-language prose.
    Text,
    /// Source code or structured text.
    Code,
    /// General binary data.
    #[default]
    Binary,
    /// Highly repetitive data.
    Repetitive,
    /// Restricted byte range, low entropy.
    LowEntropy,
    /// High entropy, effectively incompressible.
    Random,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentType::Text => "text",
            ContentType::Code => "code",
            ContentType::Binary => "binary",
            ContentType::Repetitive => "repetitive",
            ContentType::LowEntropy => "low-entropy",
            ContentType::Random => "random",
        };
        f.write_str(name)
    }
}

/// Statistics and classifications for one input.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    /// Coarse classification.
    pub content: ContentType,
    /// Programming language, when [`ContentType::Code`].
    pub language: CodeLang,
    /// Structured data format, if any.
    pub data_format: DataFormat,
    /// Markup language, if any.
    pub markup: MarkupLang,
    /// Natural/human language, if detectable.
    pub natural_language: NatLang,
    /// Shannon entropy in bits per byte, in `[0, 8]`.
    pub entropy: f64,
    /// Fraction of printable-ASCII bytes, in `[0, 1]`.
    pub ascii_ratio: f64,
    /// Number of distinct byte values, in `[0, 256]`.
    pub unique_bytes: usize,
    /// Estimated repetition rate, in `[0, 1]`.
    pub repetition_rate: f64,
    /// Source-code likelihood score, in `[0, 1]`.
    pub code_score: f64,
}

/// Analyze `data` and return its profile.
///
/// Inputs larger than 8 KiB are judged by their first 8 KiB. Empty input
/// classifies as [`ContentType::Random`] with all statistics zero.
pub fn detect(data: &[u8]) -> Profile {
    if data.is_empty() {
        return Profile {
            content: ContentType::Random,
            ..Profile::default()
        };
    }

    let sample = &data[..data.len().min(SAMPLE_SIZE)];

    let mut freq = [0usize; 256];
    for &b in sample {
        freq[usize::from(b)] += 1;
    }

    let unique_bytes = freq.iter().filter(|&&f| f > 0).count();

    let n = sample.len() as f64;
    let entropy: f64 = freq
        .iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / n;
            -p * p.log2()
        })
        .sum();

    let ascii_count = sample
        .iter()
        .filter(|&&b| (0x20..=0x7E).contains(&b) || b == b'\t' || b == b'\n' || b == b'\r')
        .count();
    let ascii_ratio = ascii_count as f64 / n;

    let repetition_rate = estimate_repetition(sample);
    let code_score = compute_code_score(sample, &freq);

    // Lossy text view for the substring-based detectors. The patterns
    // are pure ASCII, so replacement characters never create matches.
    let text = String::from_utf8_lossy(sample);

    let mut profile = Profile {
        entropy,
        ascii_ratio,
        unique_bytes,
        repetition_rate,
        code_score,
        data_format: format::detect_data_format(&text),
        markup: format::detect_markup(&text),
        natural_language: natural::detect_natural_language(&text),
        ..Profile::default()
    };

    profile.content = match () {
        // Structured data is a kind of code.
        _ if profile.data_format != DataFormat::None => ContentType::Code,
        // Markup is text, unless it is HTML dense with script.
        _ if profile.markup != MarkupLang::None => {
            if profile.markup == MarkupLang::Html && code_score >= 0.4 {
                profile.language = CodeLang::JavaScript;
                ContentType::Code
            } else {
                ContentType::Text
            }
        }
        _ if ascii_ratio > 0.85 && code_score >= 0.4 => {
            profile.language = code::detect_language(&text);
            ContentType::Code
        }
        _ if ascii_ratio > 0.85 => ContentType::Text,
        _ if repetition_rate > 0.3 => ContentType::Repetitive,
        _ if entropy < 5.0 => ContentType::LowEntropy,
        _ if entropy > 7.5 && unique_bytes > 250 => ContentType::Random,
        _ => ContentType::Binary,
    };

    profile
}

/// Estimate how repetitive the data is by hashing every other
/// overlapping 4-byte window and counting re-seen hashes.
fn estimate_repetition(data: &[u8]) -> f64 {
    if data.len() < 8 {
        return 0.0;
    }

    let mut seen: HashMap<u32, u32> = HashMap::new();
    let mut repeats = 0usize;
    let mut total = 0usize;

    let mut i = 0;
    while i + 4 <= data.len() {
        let hash = u32::from(data[i])
            | u32::from(data[i + 1]) << 8
            | u32::from(data[i + 2]) << 16
            | u32::from(data[i + 3]) << 24;

        let count = seen.entry(hash).or_insert(0);
        if *count > 0 {
            repeats += 1;
        }
        *count += 1;
        total += 1;
        i += 2;
    }

    if total == 0 {
        return 0.0;
    }
    repeats as f64 / total as f64
}

/// Score the likelihood that `data` is source code, in `[0, 1]`.
///
/// Six indicators each add a fixed weight when their density crosses a
/// threshold: brackets, statement punctuation, quotes, tabs, a low
/// space ratio, and operators.
fn compute_code_score(data: &[u8], freq: &[usize; 256]) -> f64 {
    let n = data.len() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let density = |bytes: &[u8]| -> f64 {
        bytes.iter().map(|&b| freq[usize::from(b)]).sum::<usize>() as f64 / n
    };

    let mut score: f64 = 0.0;

    if density(b"{}[]()") > 0.02 {
        score += 0.3;
    }
    if density(b";:") > 0.01 {
        score += 0.2;
    }
    if density(b"\"'") > 0.02 {
        score += 0.1;
    }
    if density(b"\t") > 0.02 {
        score += 0.2;
    }
    if density(b" ") < 0.12 {
        score += 0.1;
    }
    if density(b"=+-*/<>") > 0.01 {
        score += 0.1;
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds_hold(profile: &Profile) {
        assert!((0.0..=8.0).contains(&profile.entropy));
        assert!((0.0..=1.0).contains(&profile.ascii_ratio));
        assert!(profile.unique_bytes <= 256);
        assert!((0.0..=1.0).contains(&profile.repetition_rate));
        assert!((0.0..=1.0).contains(&profile.code_score));
    }

    #[test]
    fn empty_is_random() {
        let profile = detect(&[]);
        assert_eq!(profile.content, ContentType::Random);
        assert_eq!(profile.entropy, 0.0);
        assert_eq!(profile.unique_bytes, 0);
    }

    #[test]
    fn prose_is_text() {
        let profile = detect(
            b"It is a truth universally acknowledged, that a single man in \
              possession of a good fortune, must be in want of a wife.",
        );
        bounds_hold(&profile);
        assert_eq!(profile.content, ContentType::Text);
        assert_eq!(profile.natural_language, NatLang::English);
    }

    #[test]
    fn go_source_is_code() {
        let source = br#"package main

import (
	"fmt"
	"os"
)

func main() {
	data, err := os.ReadFile("input.txt")
	if err != nil {
		fmt.Println(err)
		return
	}
	for _, line := range data {
		fmt.Println(line)
	}
}
"#;
        let profile = detect(source);
        bounds_hold(&profile);
        assert_eq!(profile.content, ContentType::Code);
        assert_eq!(profile.language, CodeLang::Go);
    }

    #[test]
    fn repetitive_binary() {
        let data = [0xAAu8; 1000];
        let profile = detect(&data);
        bounds_hold(&profile);
        assert_eq!(profile.content, ContentType::Repetitive);
    }

    #[test]
    fn all_distinct_bytes_is_random_or_binary() {
        let data: Vec<u8> = (0..=255u8).collect();
        let profile = detect(&data);
        bounds_hold(&profile);
        assert!(matches!(
            profile.content,
            ContentType::Random | ContentType::Binary
        ));
        assert_eq!(profile.unique_bytes, 256);
        assert!(profile.entropy > 7.9);
    }

    #[test]
    fn json_is_code_via_data_format() {
        let profile = detect(br#"{"name": "test", "values": [1, 2, 3], "nested": {"a": true}}"#);
        assert_eq!(profile.data_format, DataFormat::Json);
        assert_eq!(profile.content, ContentType::Code);
    }

    #[test]
    fn markdown_is_text() {
        let doc = b"# Title\n\nSome intro text here.\n\n## Section\n\n- item one\n- item two\n\n```\ncode block\n```\n";
        let profile = detect(doc);
        assert_eq!(profile.markup, MarkupLang::Markdown);
        assert_eq!(profile.content, ContentType::Text);
    }

    #[test]
    fn sample_is_capped() {
        // Text head, garbage tail: only the head is examined.
        let mut data = b"the and is to of a in that it for ".repeat(300);
        assert!(data.len() > SAMPLE_SIZE);
        data.extend(std::iter::repeat(0xFFu8).take(100_000));
        let profile = detect(&data);
        assert_eq!(profile.content, ContentType::Text);
    }

    #[test]
    fn repetition_rate_high_for_repeats() {
        let data = b"abcdabcdabcdabcdabcdabcdabcdabcd";
        assert!(estimate_repetition(data) > 0.5);
        assert_eq!(estimate_repetition(b"short"), 0.0);
    }
}
