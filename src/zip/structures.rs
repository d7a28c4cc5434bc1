//! ZIP data structures, constants and field conversions.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

/// ZIP compression methods, including the two proprietary extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Method 0: no compression.
    Store,
    /// Method 8: standard DEFLATE.
    Deflate,
    /// Method 85: BPE tokens + rANS entropy coding.
    Unzlate,
    /// Method 86: BPE tokens + DEFLATE.
    Bpelate,
    /// Anything else; listable but not extractable.
    Unknown(u16),
}

impl Method {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => Method::Store,
            8 => Method::Deflate,
            85 => Method::Unzlate,
            86 => Method::Bpelate,
            other => Method::Unknown(other),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            Method::Store => 0,
            Method::Deflate => 8,
            Method::Unzlate => 85,
            Method::Bpelate => 86,
            Method::Unknown(v) => *v,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Store => "Stored",
            Method::Deflate => "Deflate",
            Method::Unzlate => "Unzlate",
            Method::Bpelate => "Bpelate",
            Method::Unknown(_) => "Unknown",
        };
        f.write_str(name)
    }
}

// Record signatures.
pub const SIG_LOCAL_FILE: u32 = 0x0403_4b50;
pub const SIG_CENTRAL_DIR: u32 = 0x0201_4b50;
pub const SIG_END_CENTRAL_DIR: u32 = 0x0605_4b50;

// Fixed record sizes (excluding variable-length tails).
pub const LOCAL_HEADER_SIZE: usize = 30;
pub const CENTRAL_HEADER_SIZE: usize = 46;
pub const EOCD_SIZE: usize = 22;

/// Maximum ZIP comment size; bounds the backward EOCD search.
pub const MAX_COMMENT_SIZE: usize = 65535;

/// Version needed to extract: 2.0, the minimum for DEFLATE.
pub const ZIP_VERSION: u16 = 20;
/// Version made by: Unix (3) in the high byte, 2.0 in the low byte, so
/// external attributes carry a Unix mode.
pub const ZIP_VERSION_UNIX: u16 = 0x0314;
/// General-purpose flag bit 11: the name is UTF-8.
pub const FLAG_UTF8: u16 = 0x0800;

// Unix st_mode file-type field.
pub const UNIX_MODE_TYPE_MASK: u32 = 0o170000;
pub const UNIX_MODE_REGULAR: u32 = 0o100000;
pub const UNIX_MODE_DIR: u32 = 0o040000;
pub const UNIX_MODE_SYMLINK: u32 = 0o120000;

// Extra field ids.
pub const EXTRA_EXTENDED_TIMESTAMP: u16 = 0x5455;
pub const EXTRA_VOCAB_INFO: u16 = 0x554E;

/// True when `mode` marks a directory.
pub fn mode_is_dir(mode: u32) -> bool {
    mode & UNIX_MODE_TYPE_MASK == UNIX_MODE_DIR
}

/// True when `mode` marks a symbolic link.
pub fn mode_is_symlink(mode: u32) -> bool {
    mode & UNIX_MODE_TYPE_MASK == UNIX_MODE_SYMLINK
}

/// Natural-language codes carried in the vocab-info extra field,
/// ordered by global coverage priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum NatLang {
    #[default]
    Unspecified = 0x00,
    English = 0x01,
    Spanish = 0x02,
    French = 0x03,
    Portuguese = 0x04,
    German = 0x05,
    Italian = 0x06,
    Dutch = 0x07,
    /// Simplified + Traditional.
    Chinese = 0x08,
    Arabic = 0x09,
    Hindi = 0x0A,
    /// Indonesian/Malay.
    Indonesian = 0x0B,
    Bengali = 0x0C,
    Russian = 0x0D,
    Japanese = 0x0E,
}

impl NatLang {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => NatLang::English,
            0x02 => NatLang::Spanish,
            0x03 => NatLang::French,
            0x04 => NatLang::Portuguese,
            0x05 => NatLang::German,
            0x06 => NatLang::Italian,
            0x07 => NatLang::Dutch,
            0x08 => NatLang::Chinese,
            0x09 => NatLang::Arabic,
            0x0A => NatLang::Hindi,
            0x0B => NatLang::Indonesian,
            0x0C => NatLang::Bengali,
            0x0D => NatLang::Russian,
            0x0E => NatLang::Japanese,
            _ => NatLang::Unspecified,
        }
    }
}

impl std::fmt::Display for NatLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NatLang::Unspecified => "unspecified",
            NatLang::English => "en",
            NatLang::Spanish => "es",
            NatLang::French => "fr",
            NatLang::Portuguese => "pt",
            NatLang::German => "de",
            NatLang::Italian => "it",
            NatLang::Dutch => "nl",
            NatLang::Chinese => "zh",
            NatLang::Arabic => "ar",
            NatLang::Hindi => "hi",
            NatLang::Indonesian => "id",
            NatLang::Bengali => "bn",
            NatLang::Russian => "ru",
            NatLang::Japanese => "ja",
        };
        f.write_str(name)
    }
}

/// Programming-language codes carried in the vocab-info extra field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ProgLang {
    #[default]
    None = 0x00,
    Go = 0x01,
    Python = 0x02,
    /// Includes TypeScript.
    JavaScript = 0x03,
    Java = 0x04,
    C = 0x05,
    Cpp = 0x06,
    CSharp = 0x07,
    Ruby = 0x08,
    Rust = 0x09,
    Php = 0x0A,
    Swift = 0x0B,
    Kotlin = 0x0C,
}

impl ProgLang {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => ProgLang::Go,
            0x02 => ProgLang::Python,
            0x03 => ProgLang::JavaScript,
            0x04 => ProgLang::Java,
            0x05 => ProgLang::C,
            0x06 => ProgLang::Cpp,
            0x07 => ProgLang::CSharp,
            0x08 => ProgLang::Ruby,
            0x09 => ProgLang::Rust,
            0x0A => ProgLang::Php,
            0x0B => ProgLang::Swift,
            0x0C => ProgLang::Kotlin,
            _ => ProgLang::None,
        }
    }
}

impl std::fmt::Display for ProgLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProgLang::None => "none",
            ProgLang::Go => "go",
            ProgLang::Python => "python",
            ProgLang::JavaScript => "javascript",
            ProgLang::Java => "java",
            ProgLang::C => "c",
            ProgLang::Cpp => "c++",
            ProgLang::CSharp => "c#",
            ProgLang::Ruby => "ruby",
            ProgLang::Rust => "rust",
            ProgLang::Php => "php",
            ProgLang::Swift => "swift",
            ProgLang::Kotlin => "kotlin",
        };
        f.write_str(name)
    }
}

/// Structured-data-format codes carried in the vocab-info extra field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DataFmt {
    #[default]
    None = 0x00,
    Json = 0x01,
    Xml = 0x02,
    Yaml = 0x03,
    Csv = 0x04,
    Toml = 0x05,
    Ini = 0x06,
}

impl DataFmt {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => DataFmt::Json,
            0x02 => DataFmt::Xml,
            0x03 => DataFmt::Yaml,
            0x04 => DataFmt::Csv,
            0x05 => DataFmt::Toml,
            0x06 => DataFmt::Ini,
            _ => DataFmt::None,
        }
    }
}

impl std::fmt::Display for DataFmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataFmt::None => "none",
            DataFmt::Json => "json",
            DataFmt::Xml => "xml",
            DataFmt::Yaml => "yaml",
            DataFmt::Csv => "csv",
            DataFmt::Toml => "toml",
            DataFmt::Ini => "ini",
        };
        f.write_str(name)
    }
}

/// Markup-language codes carried in the vocab-info extra field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MarkupLang {
    #[default]
    None = 0x00,
    Html = 0x01,
    Markdown = 0x02,
    Latex = 0x03,
    Rtf = 0x04,
    /// reStructuredText.
    Rest = 0x05,
    AsciiDoc = 0x06,
    /// Emacs Org-mode.
    Org = 0x07,
}

impl MarkupLang {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => MarkupLang::Html,
            0x02 => MarkupLang::Markdown,
            0x03 => MarkupLang::Latex,
            0x04 => MarkupLang::Rtf,
            0x05 => MarkupLang::Rest,
            0x06 => MarkupLang::AsciiDoc,
            0x07 => MarkupLang::Org,
            _ => MarkupLang::None,
        }
    }
}

impl std::fmt::Display for MarkupLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MarkupLang::None => "none",
            MarkupLang::Html => "html",
            MarkupLang::Markdown => "markdown",
            MarkupLang::Latex => "latex",
            MarkupLang::Rtf => "rtf",
            MarkupLang::Rest => "rst",
            MarkupLang::AsciiDoc => "asciidoc",
            MarkupLang::Org => "org",
        };
        f.write_str(name)
    }
}

/// Legacy single-byte language ids accepted in old vocab-info fields.
pub const LEGACY_LANG_GO: u8 = 0x01;
pub const LEGACY_LANG_PY: u8 = 0x02;
pub const LEGACY_LANG_JS: u8 = 0x03;

/// Language metadata for BPE vocabulary selection, carried in ZIP extra
/// field 0x554E as four bytes: natural language, programming language,
/// data format, markup. A zero byte means unspecified/none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VocabInfo {
    pub nat_lang: NatLang,
    pub prog_lang: ProgLang,
    pub data_fmt: DataFmt,
    pub markup: MarkupLang,
}

/// Metadata for one file in an archive.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Stored name, with `/` separators; directories end in `/`.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub comp_size: u64,
    /// Compression method.
    pub method: Method,
    /// CRC-32/IEEE of the original bytes.
    pub crc32: u32,
    /// Modification time, if recorded.
    pub mod_time: Option<DateTime<Utc>>,
    /// Unix mode (permissions + file type).
    pub mode: u32,
    /// Offset of the local header within the archive.
    pub offset: u64,
    /// Vocabulary info for Bpelate/Unzlate entries.
    pub vocab: VocabInfo,
}

impl FileInfo {
    /// True when this entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// Convert a modification time to DOS time/date fields.
///
/// Seconds round down to a multiple of 2 and the year is clamped to the
/// DOS range 1980–2107. `None` maps to zeroed fields.
pub fn time_to_dos(time: Option<DateTime<Utc>>) -> (u16, u16) {
    let Some(t) = time else {
        return (0, 0);
    };

    let year = t.year().clamp(1980, 2107);
    let dos_time =
        (t.second() / 2) as u16 | ((t.minute() as u16) << 5) | ((t.hour() as u16) << 11);
    let dos_date = t.day() as u16 | ((t.month() as u16) << 5) | (((year - 1980) as u16) << 9);
    (dos_time, dos_date)
}

/// Convert DOS time/date fields back to a modification time.
///
/// Zeroed fields map to `None`, as do fields that fail to name a real
/// calendar date.
pub fn dos_to_time(dos_time: u16, dos_date: u16) -> Option<DateTime<Utc>> {
    if dos_time == 0 && dos_date == 0 {
        return None;
    }

    let sec = u32::from(dos_time & 0x1F) * 2;
    let min = u32::from((dos_time >> 5) & 0x3F);
    let hour = u32::from(dos_time >> 11);
    let day = u32::from(dos_date & 0x1F);
    let month = u32::from((dos_date >> 5) & 0x0F);
    let year = i32::from(dos_date >> 9) + 1980;

    Utc.with_ymd_and_hms(year, month, day, hour, min, sec).single()
}

/// Build the extended-timestamp extra field (0x5455): id, size = 5,
/// flags = 0x01 (mtime present), then the Unix mtime, little-endian.
/// Empty when no time is recorded.
pub fn make_extended_timestamp(time: Option<DateTime<Utc>>) -> Vec<u8> {
    let Some(t) = time else {
        return Vec::new();
    };

    let mut extra = Vec::with_capacity(9);
    extra.extend_from_slice(&EXTRA_EXTENDED_TIMESTAMP.to_le_bytes());
    extra.extend_from_slice(&5u16.to_le_bytes());
    extra.push(0x01);
    extra.extend_from_slice(&(t.timestamp() as u32).to_le_bytes());
    extra
}

/// Build the vocab-info extra field (0x554E): id, size = 4, then the
/// four language-code bytes.
pub fn make_vocab_info(info: VocabInfo) -> Vec<u8> {
    let mut extra = Vec::with_capacity(8);
    extra.extend_from_slice(&EXTRA_VOCAB_INFO.to_le_bytes());
    extra.extend_from_slice(&4u16.to_le_bytes());
    extra.push(info.nat_lang as u8);
    extra.push(info.prog_lang as u8);
    extra.push(info.data_fmt as u8);
    extra.push(info.markup as u8);
    extra
}

/// Extract the Unix mtime from an extra-field blob, if present.
pub fn parse_extended_timestamp(mut extra: &[u8]) -> Option<DateTime<Utc>> {
    while extra.len() >= 4 {
        let id = u16::from_le_bytes([extra[0], extra[1]]);
        let size = usize::from(u16::from_le_bytes([extra[2], extra[3]]));

        if extra.len() < 4 + size {
            break;
        }

        if id == EXTRA_EXTENDED_TIMESTAMP && size >= 5 && extra[4] & 0x01 != 0 {
            let mtime = u32::from_le_bytes([extra[5], extra[6], extra[7], extra[8]]);
            return Utc.timestamp_opt(i64::from(mtime), 0).single();
        }

        extra = &extra[4 + size..];
    }
    None
}

/// Extract vocabulary info from an extra-field blob, if present.
///
/// Accepts the current 4-byte record and the legacy 1-byte record,
/// which carried only a programming-language id and implied English.
pub fn parse_vocab_info(mut extra: &[u8]) -> Option<VocabInfo> {
    while extra.len() >= 4 {
        let id = u16::from_le_bytes([extra[0], extra[1]]);
        let size = usize::from(u16::from_le_bytes([extra[2], extra[3]]));

        if extra.len() < 4 + size {
            break;
        }

        if id == EXTRA_VOCAB_INFO {
            if size >= 4 {
                return Some(VocabInfo {
                    nat_lang: NatLang::from_u8(extra[4]),
                    prog_lang: ProgLang::from_u8(extra[5]),
                    data_fmt: DataFmt::from_u8(extra[6]),
                    markup: MarkupLang::from_u8(extra[7]),
                });
            }
            if size >= 1 {
                let prog_lang = match extra[4] {
                    LEGACY_LANG_GO => ProgLang::Go,
                    LEGACY_LANG_PY => ProgLang::Python,
                    LEGACY_LANG_JS => ProgLang::JavaScript,
                    _ => ProgLang::None,
                };
                return Some(VocabInfo {
                    nat_lang: NatLang::English,
                    prog_lang,
                    ..VocabInfo::default()
                });
            }
        }

        extra = &extra[4 + size..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn method_codes_roundtrip() {
        for code in [0u16, 8, 85, 86, 99] {
            assert_eq!(Method::from_u16(code).as_u16(), code);
        }
        assert_eq!(Method::from_u16(85), Method::Unzlate);
        assert_eq!(Method::from_u16(86), Method::Bpelate);
        assert_eq!(Method::Bpelate.to_string(), "Bpelate");
    }

    #[test]
    fn dos_time_two_second_precision() {
        let t = ts(2025, 1, 15, 10, 30, 45);
        let (dos_time, dos_date) = time_to_dos(Some(t));
        let parsed = dos_to_time(dos_time, dos_date).unwrap();
        let delta = (parsed.timestamp() - t.timestamp()).abs();
        assert!(delta <= 2, "delta was {delta}s");
    }

    #[test]
    fn dos_year_clamps() {
        let (_, dos_date) = time_to_dos(Some(ts(1970, 6, 1, 0, 0, 0)));
        assert_eq!(dos_date >> 9, 0); // 1980
        let (_, dos_date) = time_to_dos(Some(ts(2150, 6, 1, 0, 0, 0)));
        assert_eq!(i32::from(dos_date >> 9) + 1980, 2107);
    }

    #[test]
    fn zero_dos_fields_are_none() {
        assert_eq!(dos_to_time(0, 0), None);
        assert_eq!(time_to_dos(None), (0, 0));
    }

    #[test]
    fn extended_timestamp_roundtrip() {
        let t = ts(2025, 3, 2, 8, 15, 9);
        let extra = make_extended_timestamp(Some(t));
        assert_eq!(extra.len(), 9);
        assert_eq!(parse_extended_timestamp(&extra), Some(t));
        assert!(make_extended_timestamp(None).is_empty());
    }

    #[test]
    fn vocab_info_roundtrip() {
        let info = VocabInfo {
            nat_lang: NatLang::English,
            prog_lang: ProgLang::Go,
            data_fmt: DataFmt::None,
            markup: MarkupLang::None,
        };
        let extra = make_vocab_info(info);
        assert_eq!(extra.len(), 8);
        assert_eq!(parse_vocab_info(&extra), Some(info));
    }

    #[test]
    fn vocab_info_legacy_one_byte() {
        let extra = [
            (EXTRA_VOCAB_INFO & 0xFF) as u8,
            (EXTRA_VOCAB_INFO >> 8) as u8,
            1,
            0,
            LEGACY_LANG_PY,
        ];
        let info = parse_vocab_info(&extra).unwrap();
        assert_eq!(info.nat_lang, NatLang::English);
        assert_eq!(info.prog_lang, ProgLang::Python);
        assert_eq!(info.data_fmt, DataFmt::None);
        assert_eq!(info.markup, MarkupLang::None);
    }

    #[test]
    fn vocab_info_skips_other_fields() {
        let mut extra = make_extended_timestamp(Some(ts(2024, 1, 1, 0, 0, 0)));
        extra.extend(make_vocab_info(VocabInfo {
            prog_lang: ProgLang::Rust,
            ..VocabInfo::default()
        }));
        assert_eq!(parse_vocab_info(&extra).unwrap().prog_lang, ProgLang::Rust);
        assert!(parse_extended_timestamp(&extra).is_some());
    }

    #[test]
    fn mode_helpers() {
        assert!(mode_is_dir(UNIX_MODE_DIR | 0o755));
        assert!(mode_is_symlink(UNIX_MODE_SYMLINK | 0o777));
        assert!(!mode_is_dir(UNIX_MODE_REGULAR | 0o644));
        assert!(!mode_is_symlink(UNIX_MODE_REGULAR | 0o644));
    }
}
