//! Error types shared across the crate.

/// Errors produced by archive and codec operations.
///
/// Every fallible operation in the crate returns one of these; no partial
/// results are handed back alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input does not start with a ZIP local-file-header signature.
    #[error("not a valid ZIP archive")]
    InvalidFormat,

    /// A signature, size, frequency table or CRC check failed mid-stream.
    #[error("corrupted archive data")]
    Corrupted,

    /// The input ended before a complete structure could be read.
    #[error("data too short")]
    TooShort,

    /// The entry uses a compression method this crate does not implement.
    #[error("unsupported compression method {0}")]
    Unsupported(u16),

    /// An entry's compressed or uncompressed size exceeds the 4 GiB
    /// limit of the classic ZIP format (ZIP64 is not supported).
    #[error("file exceeds 4 GiB limit (ZIP64 not supported)")]
    FileTooLarge,
}

/// Result type for bpezip operations.
pub type Result<T> = std::result::Result<T, Error>;
