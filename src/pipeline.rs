//! Adaptive compression pipeline.
//!
//! The [`Compressor`] classifies each input with the content detector,
//! runs the candidate methods for that class, and keeps the smallest
//! result. DEFLATE always competes, so the chosen method never loses to
//! the standard baseline; ties go to DEFLATE as the most portable
//! output.
//!
//! ## Method selection
//!
//! | Profile      | Candidates                          |
//! |--------------|-------------------------------------|
//! | empty        | Store                               |
//! | Random       | Store                               |
//! | Text         | Deflate, Bpelate (text vocabulary)  |
//! | Code         | Deflate, Unzlate, Bpelate (language vocabulary) |
//! | anything else| Deflate                             |

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::bpe::{Encoder, SharedVocabulary};
use crate::detect::{self, CodeLang, ContentType};
use crate::error::{Error, Result};
use crate::zip::structures::{
    make_extended_timestamp, make_vocab_info, time_to_dos, FLAG_UTF8, UNIX_MODE_REGULAR,
    UNIX_MODE_TYPE_MASK,
};
use crate::zip::writer::{
    name_needs_utf8_flag, write_central_dir_entry, write_end_central_dir, write_local_header,
};
use crate::zip::{self, FileInfo, Method, NatLang, ProgLang, VocabInfo};
use crate::{deflate, rans, varint, vocab};

/// Default Unix permissions when the caller does not supply a mode.
const DEFAULT_MODE: u32 = 0o644;

impl From<CodeLang> for ProgLang {
    fn from(lang: CodeLang) -> Self {
        match lang {
            CodeLang::Unknown => ProgLang::None,
            CodeLang::Go => ProgLang::Go,
            CodeLang::Python => ProgLang::Python,
            CodeLang::JavaScript => ProgLang::JavaScript,
            CodeLang::Java => ProgLang::Java,
            CodeLang::C => ProgLang::C,
            CodeLang::Cpp => ProgLang::Cpp,
            CodeLang::CSharp => ProgLang::CSharp,
            CodeLang::Ruby => ProgLang::Ruby,
            CodeLang::Rust => ProgLang::Rust,
            CodeLang::Php => ProgLang::Php,
            CodeLang::Swift => ProgLang::Swift,
            CodeLang::Kotlin => ProgLang::Kotlin,
        }
    }
}

/// Outcome of method selection: the compressed payload, the method that
/// produced it, and the vocab metadata to record alongside it.
pub(crate) struct Selection {
    pub data: Vec<u8>,
    pub method: Method,
    pub vocab: VocabInfo,
}

/// ZIP-compatible compressor with adaptive method selection.
///
/// Holds the default (text) vocabulary; language-specific vocabularies
/// come from the process-wide registry on demand. The compressor itself
/// is immutable and cheap to clone.
#[derive(Clone)]
pub struct Compressor {
    text_encoder: Encoder,
}

impl Compressor {
    /// Create a compressor with the given default vocabulary.
    pub fn new(vocab: SharedVocabulary) -> Self {
        Self {
            text_encoder: Encoder::new(vocab),
        }
    }

    /// Create a compressor with the embedded text vocabulary.
    pub fn with_default_vocabulary() -> Self {
        Self::new(vocab::default())
    }

    // === Compression ===

    /// Create a single-file ZIP archive, auto-selecting the method.
    pub fn compress_file(
        &self,
        data: &[u8],
        name: &str,
        mod_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<u8>> {
        self.compress_file_with_mode(data, name, mod_time, DEFAULT_MODE)
    }

    /// Like [`compress_file`](Self::compress_file), with explicit Unix
    /// permissions.
    pub fn compress_file_with_mode(
        &self,
        data: &[u8],
        name: &str,
        mod_time: Option<DateTime<Utc>>,
        mode: u32,
    ) -> Result<Vec<u8>> {
        let selection = self.select(data)?;
        self.build_single(data, selection, name, mod_time, mode)
    }

    /// Create a single-file ZIP archive with a forced method.
    pub fn compress_file_as(
        &self,
        data: &[u8],
        name: &str,
        mod_time: Option<DateTime<Utc>>,
        method: Method,
    ) -> Result<Vec<u8>> {
        self.compress_file_as_with_mode(data, name, mod_time, DEFAULT_MODE, method)
    }

    /// Like [`compress_file_as`](Self::compress_file_as), with explicit
    /// Unix permissions.
    pub fn compress_file_as_with_mode(
        &self,
        data: &[u8],
        name: &str,
        mod_time: Option<DateTime<Utc>>,
        mode: u32,
        method: Method,
    ) -> Result<Vec<u8>> {
        let compressed = self.compress_with(data, method)?;
        let vocab = match method {
            // Forced BPE methods use the default text vocabulary; mark
            // the entry so decoders know nothing more specific.
            Method::Unzlate | Method::Bpelate => VocabInfo {
                nat_lang: NatLang::English,
                ..VocabInfo::default()
            },
            _ => VocabInfo::default(),
        };
        let selection = Selection {
            data: compressed,
            method,
            vocab,
        };
        self.build_single(data, selection, name, mod_time, mode)
    }

    /// Run method selection for one input.
    pub(crate) fn select(&self, data: &[u8]) -> Result<Selection> {
        if data.is_empty() {
            return Ok(Selection {
                data: Vec::new(),
                method: Method::Store,
                vocab: VocabInfo::default(),
            });
        }

        let profile = detect::detect(data);
        log::debug!(
            "profile: {} (entropy {:.2}, ascii {:.2}, code {:.2})",
            profile.content,
            profile.entropy,
            profile.ascii_ratio,
            profile.code_score
        );

        match profile.content {
            ContentType::Text => {
                let vocab = VocabInfo {
                    nat_lang: NatLang::English,
                    ..VocabInfo::default()
                };
                let candidates = vec![
                    (deflate::compress(data)?, Method::Deflate),
                    (self.bpelate_compress(data, &self.text_encoder)?, Method::Bpelate),
                ];
                Ok(Self::smallest(candidates, vocab))
            }
            ContentType::Code => {
                let encoder = self.encoder_for_code_lang(profile.language);
                let vocab = VocabInfo {
                    nat_lang: NatLang::English,
                    prog_lang: profile.language.into(),
                    ..VocabInfo::default()
                };
                let candidates = vec![
                    (deflate::compress(data)?, Method::Deflate),
                    (self.unzlate_compress(data, &encoder)?, Method::Unzlate),
                    (self.bpelate_compress(data, &encoder)?, Method::Bpelate),
                ];
                Ok(Self::smallest(candidates, vocab))
            }
            ContentType::Random => Ok(Selection {
                data: data.to_vec(),
                method: Method::Store,
                vocab: VocabInfo::default(),
            }),
            _ => Ok(Selection {
                data: deflate::compress(data)?,
                method: Method::Deflate,
                vocab: VocabInfo::default(),
            }),
        }
    }

    /// Pick the smallest candidate; the first strictly-smaller entry
    /// wins, so earlier candidates (DEFLATE) take ties.
    fn smallest(candidates: Vec<(Vec<u8>, Method)>, vocab: VocabInfo) -> Selection {
        let mut best: Option<(Vec<u8>, Method)> = None;
        for (data, method) in candidates {
            match &best {
                Some((b, _)) if data.len() >= b.len() => {}
                _ => best = Some((data, method)),
            }
        }
        let (data, method) = best.expect("at least one candidate");
        let vocab = match method {
            Method::Unzlate | Method::Bpelate => vocab,
            _ => VocabInfo::default(),
        };
        Selection { data, method, vocab }
    }

    /// Compress with a single, explicit method.
    fn compress_with(&self, data: &[u8], method: Method) -> Result<Vec<u8>> {
        match method {
            Method::Store => Ok(data.to_vec()),
            Method::Deflate => deflate::compress(data),
            Method::Unzlate => self.unzlate_compress(data, &self.text_encoder),
            Method::Bpelate => self.bpelate_compress(data, &self.text_encoder),
            Method::Unknown(code) => Err(Error::Unsupported(code)),
        }
    }

    /// BPE tokens → varints → rANS.
    fn unzlate_compress(&self, data: &[u8], encoder: &Encoder) -> Result<Vec<u8>> {
        rans::compress(&varint::pack(&encoder.encode(data)))
    }

    /// BPE tokens → varints → DEFLATE.
    fn bpelate_compress(&self, data: &[u8], encoder: &Encoder) -> Result<Vec<u8>> {
        deflate::compress(&varint::pack(&encoder.encode(data)))
    }

    /// Serialize one entry into a complete archive: local header, data,
    /// central directory, end record.
    fn build_single(
        &self,
        original: &[u8],
        selection: Selection,
        name: &str,
        mod_time: Option<DateTime<Utc>>,
        mode: u32,
    ) -> Result<Vec<u8>> {
        if original.len() > u32::MAX as usize || selection.data.len() > u32::MAX as usize {
            return Err(Error::FileTooLarge);
        }

        let crc = crc32fast::hash(original);
        let (dos_time, dos_date) = time_to_dos(mod_time);
        let mut flags = 0u16;
        if name_needs_utf8_flag(name) {
            flags |= FLAG_UTF8;
        }

        let mut extra = make_extended_timestamp(mod_time);
        if matches!(selection.method, Method::Unzlate | Method::Bpelate) {
            extra.extend(make_vocab_info(selection.vocab));
        }

        let mode = if mode & UNIX_MODE_TYPE_MASK == 0 {
            mode | UNIX_MODE_REGULAR
        } else {
            mode
        };
        let external_attrs = mode << 16;

        let mut buf = Vec::new();
        write_local_header(
            &mut buf,
            name,
            selection.method,
            flags,
            dos_time,
            dos_date,
            crc,
            selection.data.len() as u32,
            original.len() as u32,
            &extra,
        );
        buf.extend_from_slice(&selection.data);

        let cd_offset = buf.len();
        write_central_dir_entry(
            &mut buf,
            name,
            selection.method,
            flags,
            dos_time,
            dos_date,
            crc,
            selection.data.len() as u32,
            original.len() as u32,
            0,
            external_attrs,
            &extra,
        );
        let cd_size = buf.len() - cd_offset;
        write_end_central_dir(&mut buf, 1, cd_size as u32, cd_offset as u32);

        Ok(buf)
    }

    // === Decompression ===

    /// Extract the first file of a single-file archive.
    pub fn decompress(&self, archive: &[u8]) -> Result<Vec<u8>> {
        let info = zip::get_file_info(archive)?;
        self.decompress_file(archive, &info)
    }

    /// Extract one entry located by its [`FileInfo`].
    ///
    /// The decoded bytes are verified against the entry's CRC-32 and
    /// size; any mismatch is [`Error::Corrupted`].
    pub fn decompress_file(&self, archive: &[u8], info: &FileInfo) -> Result<Vec<u8>> {
        if info.is_directory() || (info.size == 0 && info.comp_size == 0) {
            return Ok(Vec::new());
        }

        let compressed = zip::entry_data(archive, info)?;
        let output = self.decode_entry(compressed, info)?;

        if output.len() as u64 != info.size || crc32fast::hash(&output) != info.crc32 {
            return Err(Error::Corrupted);
        }

        Ok(output)
    }

    /// Extract every file of an archive into a name → contents map.
    /// Directory entries are omitted.
    pub fn decompress_all(&self, archive: &[u8]) -> Result<HashMap<String, Vec<u8>>> {
        let files = zip::list_files(archive)?;

        let mut result = HashMap::with_capacity(files.len());
        for info in &files {
            if info.is_directory() {
                continue;
            }
            result.insert(info.name.clone(), self.decompress_file(archive, info)?);
        }

        Ok(result)
    }

    /// Decode one entry's payload by its method.
    fn decode_entry(&self, compressed: &[u8], info: &FileInfo) -> Result<Vec<u8>> {
        match info.method {
            Method::Store => Ok(compressed.to_vec()),
            Method::Deflate => deflate::decompress(compressed),
            Method::Unzlate => {
                let token_bytes = rans::decompress(compressed)?;
                let encoder = self.encoder_for_prog_lang(info.vocab.prog_lang);
                Ok(encoder.decode(&varint::unpack(&token_bytes)))
            }
            Method::Bpelate => {
                let token_bytes = deflate::decompress(compressed)?;
                let encoder = self.encoder_for_prog_lang(info.vocab.prog_lang);
                Ok(encoder.decode(&varint::unpack(&token_bytes)))
            }
            Method::Unknown(code) => Err(Error::Unsupported(code)),
        }
    }

    /// Encoder for a detected language; languages without a dedicated
    /// vocabulary fall back to the text encoder.
    fn encoder_for_code_lang(&self, lang: CodeLang) -> Encoder {
        match lang {
            CodeLang::Go => Encoder::new(vocab::for_language(vocab::Language::Go)),
            CodeLang::Python => Encoder::new(vocab::for_language(vocab::Language::Python)),
            CodeLang::JavaScript => {
                Encoder::new(vocab::for_language(vocab::Language::JavaScript))
            }
            _ => self.text_encoder.clone(),
        }
    }

    /// Encoder for the programming language named by a vocab-info
    /// record; unknown codes fall back to the text encoder.
    fn encoder_for_prog_lang(&self, lang: ProgLang) -> Encoder {
        match lang {
            ProgLang::Go => Encoder::new(vocab::for_language(vocab::Language::Go)),
            ProgLang::Python => Encoder::new(vocab::for_language(vocab::Language::Python)),
            ProgLang::JavaScript => {
                Encoder::new(vocab::for_language(vocab::Language::JavaScript))
            }
            _ => self.text_encoder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compressor() -> Compressor {
        Compressor::with_default_vocabulary()
    }

    #[test]
    fn selection_never_loses_to_deflate() {
        let comp = compressor();
        let inputs: Vec<Vec<u8>> = vec![
            b"the quick brown fox jumps over the lazy dog".to_vec(),
            b"func main() {\n\tif err != nil {\n\t\treturn\n\t}\n}\n".repeat(20),
            vec![0xAA; 1000],
            (0..=255u8).collect(),
        ];
        for input in inputs {
            let selection = comp.select(&input).unwrap();
            let baseline = deflate::compress(&input).unwrap();
            assert!(
                selection.data.len() <= baseline.len().max(input.len()),
                "method {} regressed on {} bytes",
                selection.method,
                input.len()
            );
        }
    }

    #[test]
    fn empty_selects_store() {
        let selection = compressor().select(&[]).unwrap();
        assert_eq!(selection.method, Method::Store);
        assert!(selection.data.is_empty());
    }

    #[test]
    fn random_selects_store() {
        // A de Bruijn-ish spread of all byte values, long enough to
        // classify and incompressible enough to store.
        let data: Vec<u8> = (0..4096u32)
            .map(|i| (i.wrapping_mul(2654435761) >> 16) as u8)
            .collect();
        let selection = compressor().select(&data).unwrap();
        if detect::detect(&data).content == ContentType::Random {
            assert_eq!(selection.method, Method::Store);
            assert_eq!(selection.data.len(), data.len());
        }
    }

    #[test]
    fn deflate_wins_ties() {
        // Tiny inputs: every candidate expands, DEFLATE must be chosen
        // for Text profiles on equal size.
        let comp = compressor();
        let selection = comp.select(b"the cat sat on the mat and that is that").unwrap();
        assert!(matches!(selection.method, Method::Deflate | Method::Bpelate));
        if selection.method == Method::Deflate {
            assert_eq!(selection.vocab, VocabInfo::default());
        }
    }

    #[test]
    fn vocab_info_only_for_bpe_methods() {
        let comp = compressor();
        let code = b"package main\n\nfunc main() {\n\tx := 1\n\tif err != nil {\n\t\treturn\n\t}\n\t_ = x\n}\n".repeat(10);
        let selection = comp.select(&code).unwrap();
        match selection.method {
            Method::Unzlate | Method::Bpelate => {
                assert_eq!(selection.vocab.prog_lang, ProgLang::Go);
                assert_eq!(selection.vocab.nat_lang, NatLang::English);
            }
            _ => assert_eq!(selection.vocab, VocabInfo::default()),
        }
    }

    #[test]
    fn forced_method_roundtrips() {
        let comp = compressor();
        let data = b"some moderately compressible text text text".to_vec();
        for method in [Method::Store, Method::Deflate, Method::Unzlate, Method::Bpelate] {
            let archive = comp
                .compress_file_as(&data, "x.txt", None, method)
                .unwrap();
            let info = zip::get_file_info(&archive).unwrap();
            assert_eq!(info.method, method);
            assert_eq!(comp.decompress(&archive).unwrap(), data);
        }
    }

    #[test]
    fn unknown_method_is_unsupported() {
        let comp = compressor();
        let err = comp
            .compress_file_as(b"x", "x", None, Method::Unknown(42))
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(42)));
    }

    #[test]
    fn crc_mismatch_is_corrupted() {
        let comp = compressor();
        let data = b"verify me, verify me, verify me".to_vec();
        let mut archive = comp.compress_file(&data, "v.txt", None).unwrap();
        // Flip a byte inside the stored CRC field of the local header.
        archive[14] ^= 0xFF;
        assert!(matches!(comp.decompress(&archive), Err(Error::Corrupted)));
    }
}
