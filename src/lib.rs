//! # bpezip
//!
//! A PKZIP-compatible archiver with an adaptive compression pipeline.
//!
//! Every input is classified by a content detector (text, code, binary,
//! repetitive, random), and the pipeline runs the candidate methods for
//! that class, keeping the smallest result. Beyond the standard Store
//! and DEFLATE methods, two proprietary methods pre-tokenize input with
//! Byte Pair Encoding against a language-matched vocabulary:
//!
//! - **Bpelate** (method 86): BPE tokens as varints, then DEFLATE
//! - **Unzlate** (method 85): BPE tokens as varints, then rANS
//!
//! Archives remain standard PKZIP: any ZIP tool can list them and
//! extract the Stored/DEFLATE entries. BPE entries carry a vocab-info
//! extra field (0x554E) naming the vocabulary needed to decode them.
//!
//! ## Example
//!
//! ```
//! use bpezip::Compressor;
//!
//! let compressor = Compressor::with_default_vocabulary();
//! let archive = compressor
//!     .compress_file(b"hello, hello, hello world", "hello.txt", None)
//!     .unwrap();
//!
//! assert!(bpezip::is_valid_format(&archive));
//! assert_eq!(
//!     compressor.decompress(&archive).unwrap(),
//!     b"hello, hello, hello world"
//! );
//! ```

pub mod archive;
pub mod bpe;
pub mod deflate;
pub mod detect;
pub mod error;
pub mod pipeline;
pub mod rans;
pub mod varint;
pub mod vocab;
pub mod zip;

pub use archive::Archive;
pub use error::{Error, Result};
pub use pipeline::Compressor;
pub use zip::{
    get_file_info, is_valid_format, list_files, DataFmt, FileInfo, MarkupLang, Method, NatLang,
    ProgLang, VocabInfo,
};
