//! Host loop: feeds saves and settings changes into the rule engine.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use reimport_engine::{
    Notifier, PluginConfig, ProcessOutcome, ProcessResult, Rule, RuleFailure, RuleManager,
    TextDocument, format_report,
};
use tracing::{debug, error, info, warn};

use crate::detect::GO_LANGUAGE_ID;
use crate::document::FileDocument;
use crate::settings::SettingsStore;
use crate::watcher::{HostEvent, SaveEvent, SaveWatcher};

/// Notifier that prints reports to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn applied(&self, path: &Path, result: &ProcessResult) {
        let report = format_report(result, Some(&path.display().to_string()));
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{report}");
    }

    fn rule_failed(&self, path: &Path, failure: &RuleFailure) {
        warn!(
            path = %path.display(),
            rule = %failure.rule_name,
            line = failure.line_number + 1,
            "Rule failed: {}",
            failure.error
        );
    }
}

/// Engine plus the settings file it follows.
pub struct Host {
    manager: RuleManager,
    settings: SettingsStore,
}

impl Host {
    /// Load settings and build the engine.
    ///
    /// # Errors
    /// Fails when the settings file exists but cannot be loaded.
    pub fn new(settings: SettingsStore, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let config = settings.load()?;
        Ok(Self {
            manager: RuleManager::new(config).with_notifier(notifier),
            settings,
        })
    }

    /// The engine instance.
    #[must_use]
    pub fn manager(&self) -> &RuleManager {
        &self.manager
    }

    /// Re-read the settings file and refresh the engine.
    ///
    /// On failure the previous configuration stays active.
    ///
    /// # Errors
    /// Fails when the settings file cannot be loaded.
    pub fn reload_settings(&mut self) -> Result<()> {
        let config = self.settings.load()?;
        self.manager.refresh(config);
        Ok(())
    }

    /// Handle one save event. Non-Go files are ignored and yield `None`.
    ///
    /// # Errors
    /// Fails when the file cannot be read or the edit cannot be committed.
    pub async fn handle_save(&mut self, event: &SaveEvent) -> Result<Option<ProcessOutcome>> {
        if event.language_id != GO_LANGUAGE_ID {
            debug!(path = %event.path.display(), language = %event.language_id, "Not a Go file");
            return Ok(None);
        }
        let document = FileDocument::open(&event.path)
            .await
            .with_context(|| format!("Failed to open {}", event.path.display()))?;
        let outcome = self.manager.process_document(&document).await?;
        Ok(Some(outcome))
    }

    /// Process one file immediately, as the "run now" action does.
    ///
    /// # Errors
    /// Fails when the file is not a Go document, cannot be read, or the
    /// edit cannot be committed.
    pub async fn run_now(&mut self, path: &Path) -> Result<ProcessOutcome> {
        let document = FileDocument::open(path)
            .await
            .with_context(|| format!("Failed to open {}", path.display()))?;
        if document.language_id() != GO_LANGUAGE_ID {
            warn!(path = %path.display(), "Current document is not a Go file");
            anyhow::bail!("not a Go file: {}", path.display());
        }
        Ok(self.manager.process_document(&document).await?)
    }

    /// Drive watcher events until Ctrl-C or the watcher stops.
    ///
    /// Per-file failures are logged and the loop continues.
    ///
    /// # Errors
    /// Fails only when the Ctrl-C handler cannot be installed.
    pub async fn run(&mut self, mut watcher: SaveWatcher) -> Result<()> {
        info!(settings = %self.settings.path().display(), "Host started");
        loop {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl-C")?;
                    info!("Shutting down");
                    watcher.stop().await;
                    break;
                }
                event = watcher.recv() => match event {
                    Some(HostEvent::Saved(save)) => match self.handle_save(&save).await {
                        Ok(Some(outcome)) => {
                            debug!(path = %save.path.display(), ?outcome, "Save handled");
                        }
                        Ok(None) => {}
                        Err(e) => error!(path = %save.path.display(), "{e:#}"),
                    },
                    Some(HostEvent::SettingsChanged) => {
                        if let Err(e) = self.reload_settings() {
                            error!("Settings reload failed, keeping previous rules: {e:#}");
                        }
                    }
                    Some(HostEvent::Error(message)) => warn!("Watcher error: {message}"),
                    None => break,
                },
            }
        }
        Ok(())
    }
}

/// Render the "test rule" action for the terminal.
///
/// With `text` the rule runs on that text; otherwise on the built-in import
/// samples. Settings are not consulted.
///
/// # Errors
/// Fails when the rule cannot be applied to `text`, or JSON output cannot be
/// serialized.
pub fn rule_test_report(rule: &Rule, text: Option<&str>, json: bool) -> Result<String> {
    let manager = RuleManager::new(PluginConfig::default());

    if let Some(text) = text {
        let outcome = manager.test_rule(rule, text);
        if json {
            return Ok(serde_json::to_string_pretty(&outcome)?);
        }
        if let Some(error) = &outcome.error {
            anyhow::bail!("rule failed: {error}");
        }
        return Ok(outcome.result);
    }

    let samples = manager.test_rule_against_samples(rule);
    if json {
        return Ok(serde_json::to_string_pretty(&samples)?);
    }
    let mut output = String::new();
    for sample in &samples {
        let _ = writeln!(output, "// {} ({})", sample.case.name, sample.case.description);
        match &sample.outcome.error {
            None => {
                let _ = writeln!(output, "{}\n", sample.outcome.result);
            }
            Some(error) => {
                let _ = writeln!(output, "[error] {error}\n");
            }
        }
    }
    Ok(output)
}
