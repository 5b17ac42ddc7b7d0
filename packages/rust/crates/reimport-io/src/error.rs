//! Error types for host I/O.
//!
//! Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for file I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// File is not valid UTF-8.
    #[error("Invalid UTF-8 in {path} at byte {offset}")]
    Encoding {
        /// File that failed to decode.
        path: String,
        /// Offset of the first invalid byte.
        offset: usize,
    },

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),

    /// File watcher could not be set up.
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}
