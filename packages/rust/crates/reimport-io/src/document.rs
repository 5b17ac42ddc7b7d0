//! File-backed document for the rewrite engine.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use reimport_engine::{LineEdit, TextDocument, apply_line_edits};
use tracing::{debug, warn};

use crate::async_io::{read_source_async, write_atomic};
use crate::detect::language_id_for;
use crate::error::IoError;
use crate::sync::MAX_TEXT_BYTES;

/// Snapshot of a source file on disk.
///
/// The snapshot is taken on open and follows every successful commit. A
/// commit is refused when the file changed on disk after the snapshot.
/// Only valid UTF-8 files can be opened, so a commit never alters bytes
/// outside the edited lines.
#[derive(Debug)]
pub struct FileDocument {
    path: PathBuf,
    language_id: String,
    text: Mutex<String>,
}

impl FileDocument {
    /// Read `path` and take a snapshot.
    ///
    /// # Errors
    /// Any [`IoError`] from reading the file, including
    /// `IoError::Encoding` for files that are not valid UTF-8.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, IoError> {
        let path = path.into();
        let text = read_source_async(&path, MAX_TEXT_BYTES).await?;
        Ok(Self::from_text(path, text))
    }

    /// Wrap an already-read snapshot.
    #[must_use]
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let language_id = language_id_for(&path).to_string();
        Self {
            path,
            language_id,
            text: Mutex::new(text.into()),
        }
    }

    /// Override the language tag derived from the extension.
    #[must_use]
    pub fn with_language_id(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = language_id.into();
        self
    }

    fn snapshot(&self) -> MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TextDocument for FileDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn text(&self) -> String {
        self.snapshot().clone()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.snapshot().split('\n').nth(line).map(str::to_string)
    }

    async fn apply_atomic_edit(&self, edits: Vec<LineEdit>) -> anyhow::Result<bool> {
        let before = self.text();
        let updated = match apply_line_edits(&before, &edits) {
            Ok(updated) => updated,
            Err(line) => {
                warn!(path = %self.path.display(), line, "Edit addresses a missing line");
                return Ok(false);
            }
        };

        let on_disk = read_source_async(&self.path, MAX_TEXT_BYTES).await?;
        if on_disk != before {
            warn!(path = %self.path.display(), "File changed on disk, edit skipped");
            return Ok(false);
        }

        write_atomic(&self.path, updated.clone()).await?;
        debug!(path = %self.path.display(), lines = edits.len(), "Committed edit");
        *self.snapshot() = updated;
        Ok(true)
    }
}
