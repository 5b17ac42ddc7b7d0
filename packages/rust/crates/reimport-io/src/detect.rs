//! Binary detection, decoding and language tags.

use std::path::Path;

use memchr::memchr;

use crate::error::IoError;

/// Language tag for Go sources.
pub const GO_LANGUAGE_ID: &str = "go";

/// Quick binary detection - checks first 8KB for NULL bytes.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), 8192);
    memchr(0, &buffer[..check_len]).is_some()
}

/// Decode bytes to String with lossy fallback.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD.
///
/// # Errors
/// Returns `IoError::BinaryFile` when binary content is detected.
pub fn decode_buffer(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }

    match String::from_utf8(buffer) {
        Ok(s) => Ok(s),
        Err(e) => Ok(String::from_utf8_lossy(&e.into_bytes()).into_owned()),
    }
}

/// Decode bytes as UTF-8, refusing anything that would not round-trip.
///
/// Documents that get written back must use this: a lossy decode would
/// replace invalid bytes on lines no edit touched.
///
/// # Errors
/// - `IoError::BinaryFile` when binary content is detected
/// - `IoError::Encoding` at the first invalid byte
pub fn decode_strict(buffer: Vec<u8>, path: &Path) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }

    String::from_utf8(buffer).map_err(|e| IoError::Encoding {
        path: path.to_string_lossy().to_string(),
        offset: e.utf8_error().valid_up_to(),
    })
}

/// Content-type tag for a path, derived from its extension.
#[must_use]
pub fn language_id_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("go") => GO_LANGUAGE_ID,
        Some("mod") => "go.mod",
        Some("json") => "json",
        _ => "plaintext",
    }
}
