//! Synchronous file I/O operations.
//!
//! Used for small files read outside the runtime, such as settings.

use std::fs as std_fs;
use std::io::Read;
use std::path::Path;

use crate::detect::decode_buffer;
use crate::error::IoError;

/// Upper bound for any file the host reads.
pub const MAX_TEXT_BYTES: u64 = 8 * 1024 * 1024;

/// Read text from a file with size and binary checks (synchronous).
///
/// # Errors
/// - `IoError::NotFound` if the file cannot be stat'ed
/// - `IoError::TooLarge` if it exceeds `max_bytes`
/// - `IoError::BinaryFile` if NUL bytes are found
pub fn read_text_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    let path = path.as_ref();

    let metadata = std_fs::metadata(path)
        .map_err(|_| IoError::NotFound(path.to_string_lossy().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = std_fs::File::open(path)?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or_default());
    file.read_to_end(&mut buffer)?;

    decode_buffer(buffer)
}
