//! Asynchronous file I/O operations.
//!
//! Powered by Tokio for non-blocking reads and atomic writes.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::fs as tokio_fs;
use tokio::io::AsyncReadExt;

use crate::detect::{decode_buffer, decode_strict};
use crate::error::IoError;

/// Read text from a file with size and binary checks (asynchronous).
///
/// # Errors
/// Same as [`crate::read_text_safe`].
pub async fn read_text_safe_async<P: AsRef<Path>>(
    path: P,
    max_bytes: u64,
) -> Result<String, IoError> {
    let buffer = read_limited(path.as_ref(), max_bytes).await?;
    decode_buffer(buffer)
}

/// Read a source file that may be written back.
///
/// Unlike [`read_text_safe_async`], invalid UTF-8 is an error instead of
/// being replaced.
///
/// # Errors
/// - `IoError::NotFound`, `IoError::TooLarge`, `IoError::BinaryFile` as above
/// - `IoError::Encoding` if the file is not valid UTF-8
pub async fn read_source_async<P: AsRef<Path>>(
    path: P,
    max_bytes: u64,
) -> Result<String, IoError> {
    let path = path.as_ref();
    let buffer = read_limited(path, max_bytes).await?;
    decode_strict(buffer, path)
}

async fn read_limited(path: &Path, max_bytes: u64) -> Result<Vec<u8>, IoError> {
    let metadata = tokio_fs::metadata(path)
        .await
        .map_err(|_| IoError::NotFound(path.to_string_lossy().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = tokio_fs::File::open(path).await?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or_default());
    file.read_to_end(&mut buffer).await?;
    Ok(buffer)
}

/// Replace a file's contents in one step.
///
/// The text goes to a temp file in the same directory, which is then renamed
/// over `path`. Readers see either the old or the new file, never a mix.
///
/// # Errors
/// Returns `IoError::System` when the temp file cannot be written or renamed.
pub async fn write_atomic(path: &Path, contents: String) -> Result<(), IoError> {
    let target: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic_blocking(&target, contents.as_bytes()))
        .await
        .map_err(|e| IoError::System(std::io::Error::other(e)))?
}

fn write_atomic_blocking(path: &Path, contents: &[u8]) -> Result<(), IoError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let permissions = std::fs::metadata(path).ok().map(|m| m.permissions());

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.persist(path).map_err(|e| IoError::System(e.error))?;
    Ok(())
}
