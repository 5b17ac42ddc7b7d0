//! Host document contract and the updater that commits a pass.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::error::EngineError;
use crate::types::ProcessResult;

/// Replacement text for one whole line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineEdit {
    /// Line index (0-based).
    pub line: usize,
    /// New content of the line, without the line feed.
    pub text: String,
}

/// A live document owned by the host.
///
/// Lines are the `\n`-separated segments of [`TextDocument::text`].
#[async_trait]
pub trait TextDocument: Send + Sync {
    /// File path of the document.
    fn path(&self) -> &Path;

    /// Declared content type (e.g. `go`).
    fn language_id(&self) -> &str;

    /// Full text.
    fn text(&self) -> String;

    /// Text of line `line`, if it exists.
    fn line_text(&self, line: usize) -> Option<String>;

    /// Apply all edits as one unit.
    ///
    /// `Ok(false)` means the host declined and nothing was changed.
    async fn apply_atomic_edit(&self, edits: Vec<LineEdit>) -> Result<bool>;
}

/// Collapse a pass into one edit per affected line.
///
/// Records of a line are in rule order and each carries the cumulative text,
/// so the last one wins.
#[must_use]
pub fn build_line_edits(result: &ProcessResult) -> Vec<LineEdit> {
    let mut by_line: BTreeMap<usize, &str> = BTreeMap::new();
    for replacement in &result.replacements {
        by_line.insert(replacement.line_number, &replacement.replaced_text);
    }
    by_line
        .into_iter()
        .map(|(line, text)| LineEdit {
            line,
            text: text.to_string(),
        })
        .collect()
}

/// Apply line edits to a text snapshot.
///
/// Returns the first out-of-range line index as the error.
///
/// # Errors
///
/// Fails when an edit addresses a line past the end of `text`.
pub fn apply_line_edits(text: &str, edits: &[LineEdit]) -> Result<String, usize> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    for edit in edits {
        let slot = lines.get_mut(edit.line).ok_or(edit.line)?;
        *slot = edit.text.as_str();
    }
    Ok(lines.join("\n"))
}

/// Commit a pass to the document in one transaction.
///
/// Lines that no longer read as they did when scanned abort the commit.
///
/// # Errors
///
/// - [`EngineError::Stale`] when the document moved on since the scan
/// - [`EngineError::Commit`] when the host declined the edit
/// - [`EngineError::Host`] when the host failed
pub async fn commit<D>(document: &D, result: &ProcessResult) -> Result<(), EngineError>
where
    D: TextDocument + ?Sized,
{
    let path = document.path().display().to_string();

    let mut checked = Vec::new();
    for replacement in &result.replacements {
        if checked.contains(&replacement.line_number) {
            continue;
        }
        checked.push(replacement.line_number);
        if document.line_text(replacement.line_number).as_deref()
            != Some(replacement.original_text.as_str())
        {
            return Err(EngineError::Stale {
                path,
                line: replacement.line_number,
            });
        }
    }

    let edits = build_line_edits(result);
    match document.apply_atomic_edit(edits).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(EngineError::Commit(path)),
        Err(e) => Err(EngineError::Host {
            path,
            message: format!("{e:#}"),
        }),
    }
}
