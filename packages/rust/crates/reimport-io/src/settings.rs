//! JSON settings file shared with the editor.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reimport_engine::{PluginConfig, RulesUpdate, prepare_rules_update, write_rules};
use serde_json::Value;
use tracing::{info, warn};

use crate::async_io::write_atomic;
use crate::error::IoError;
use crate::sync::{MAX_TEXT_BYTES, read_text_safe};

/// Default settings location, relative to the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = ".vscode/settings.json";

/// Loads and saves the settings document at one path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by `path`. The file does not need to exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw document. A missing file reads as `{}`.
    ///
    /// # Errors
    /// Fails when the file cannot be read or is not valid JSON.
    pub fn load_document(&self) -> Result<Value> {
        let text = match read_text_safe(&self.path, MAX_TEXT_BYTES) {
            Ok(text) => text,
            Err(IoError::NotFound(_)) => return Ok(Value::Object(serde_json::Map::new())),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read settings: {}", self.path.display()));
            }
        };
        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings JSON: {}", self.path.display()))
    }

    /// Load a validated configuration snapshot.
    ///
    /// # Errors
    /// Fails when the document cannot be read or is not a JSON object.
    pub fn load(&self) -> Result<PluginConfig> {
        let document = self.load_document()?;
        let config = PluginConfig::from_settings(&document)
            .with_context(|| format!("Invalid settings: {}", self.path.display()))?;
        info!(
            path = %self.path.display(),
            enabled = config.enabled,
            rules = config.rules.len(),
            "Loaded settings"
        );
        Ok(config)
    }

    /// Validate user-edited rules and write them back.
    ///
    /// Malformed entries are dropped with a warning. The document keeps its
    /// shape and every unrelated key.
    ///
    /// # Errors
    /// Fails when the document cannot be read, updated or written.
    pub async fn save_rules(&self, raw_rules: &Value) -> Result<RulesUpdate> {
        let update = prepare_rules_update(raw_rules);
        if update.dropped > 0 {
            warn!(dropped = update.dropped, "Dropped malformed rules before saving");
        }

        let mut document = self.load_document()?;
        write_rules(&mut document, &update.kept)?;
        let mut text = serde_json::to_string_pretty(&document)?;
        text.push('\n');

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        write_atomic(&self.path, text)
            .await
            .with_context(|| format!("Failed to write settings: {}", self.path.display()))?;

        info!(path = %self.path.display(), saved = update.kept.len(), "Saved rules");
        Ok(update)
    }
}
