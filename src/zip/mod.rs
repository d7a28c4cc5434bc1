//! PKZIP container support: structures, parsing and record emission.
//!
//! The layout is bit-exact to the PKZIP Appnote: local file headers,
//! central directory entries, and a single end-of-central-directory
//! record. ZIP64, encryption, data descriptors and multi-disk archives
//! are out of scope; entries above 4 GiB are rejected.

pub mod parser;
pub mod structures;
pub mod writer;

pub use parser::{entry_data, get_file_info, is_valid_format, list_files};
pub use structures::{
    DataFmt, FileInfo, MarkupLang, Method, NatLang, ProgLang, VocabInfo,
};
