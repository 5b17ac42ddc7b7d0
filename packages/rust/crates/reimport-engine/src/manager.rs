//! Engine instance tying configuration, exemptions and cooldown together.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::config::PluginConfig;
use crate::cooldown::CooldownTracker;
use crate::document::{TextDocument, commit};
use crate::error::EngineError;
use crate::exempt::ExemptionSet;
use crate::notifier::{Notifier, TracingNotifier};
use crate::replace::{process_text, test_rule};
use crate::rule::Rule;
use crate::samples::{SampleOutcome, run_samples};
use crate::types::{ProcessOutcome, ProcessResult, RuleTestOutcome};

/// Owns the config snapshot and per-session state of the rewrite engine.
///
/// Construct once per host session and call [`RuleManager::refresh`] on
/// every configuration change.
///
/// # Example
///
/// ```rust,ignore
/// use reimport_engine::{PluginConfig, RuleManager};
///
/// let mut manager = RuleManager::new(PluginConfig::from_settings(&settings)?);
/// let outcome = manager.process_document(&document).await?;
/// ```
pub struct RuleManager {
    config: PluginConfig,
    exemptions: ExemptionSet,
    cooldown: CooldownTracker,
    notifier: Arc<dyn Notifier>,
}

impl RuleManager {
    /// Engine with the default cooldown and a tracing notifier.
    #[must_use]
    pub fn new(config: PluginConfig) -> Self {
        let exemptions = ExemptionSet::from_rules(&config.rules);
        Self {
            config,
            exemptions,
            cooldown: CooldownTracker::default(),
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Replace the presentation sink.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the cooldown tracker.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: CooldownTracker) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Swap in a new configuration snapshot.
    pub fn refresh(&mut self, config: PluginConfig) {
        self.exemptions = ExemptionSet::from_rules(&config.rules);
        self.config = config;
        info!(
            enabled = self.config.enabled,
            rules = self.config.rules.len(),
            exemptions = self.exemptions.len(),
            "configuration refreshed"
        );
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Cooldown state.
    #[must_use]
    pub fn cooldown(&self) -> &CooldownTracker {
        &self.cooldown
    }

    /// Whether an enabled rule exempts `path`.
    #[must_use]
    pub fn is_exempt(&self, path: &Path) -> bool {
        self.exemptions.is_exempt(&path.to_string_lossy())
    }

    /// Scan `text` with the current rules. No cooldown or exemption logic.
    #[must_use]
    pub fn process_text(&self, text: &str) -> ProcessResult {
        process_text(&self.config, text)
    }

    /// Handle a save of `document` now.
    ///
    /// # Errors
    ///
    /// See [`RuleManager::process_document_at`].
    pub async fn process_document<D>(&mut self, document: &D) -> Result<ProcessOutcome, EngineError>
    where
        D: TextDocument + ?Sized,
    {
        self.process_document_at(document, Instant::now()).await
    }

    /// Handle a save of `document` at `now`.
    ///
    /// The cooldown is recorded only after a successful commit, so a failed
    /// edit is retried on the next save.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the edit could not be committed.
    pub async fn process_document_at<D>(
        &mut self,
        document: &D,
        now: Instant,
    ) -> Result<ProcessOutcome, EngineError>
    where
        D: TextDocument + ?Sized,
    {
        let path = document.path();

        if !self.config.enabled {
            debug!(path = %path.display(), "engine disabled; skipped");
            return Ok(ProcessOutcome::Disabled);
        }

        if self.cooldown.is_cooling_down(path, now) {
            debug!(path = %path.display(), "processed recently; skipped");
            return Ok(ProcessOutcome::CoolingDown);
        }

        let path_str = path.to_string_lossy();
        if let Some(rule) = self.exemptions.matching_rule(&path_str) {
            debug!(path = %path_str, %rule, "path exempt; skipped");
            return Ok(ProcessOutcome::Exempt {
                rule: rule.to_string(),
            });
        }

        let swept = self.cooldown.sweep(now);
        if swept > 0 {
            debug!(swept, "expired cooldown entries removed");
        }

        let result = process_text(&self.config, &document.text());

        if self.config.show_notifications {
            for failure in &result.failures {
                self.notifier.rule_failed(path, failure);
            }
        }

        if !result.has_changes {
            debug!(path = %path_str, "no replacements needed");
            return Ok(ProcessOutcome::Unchanged(result));
        }

        if let Err(e) = commit(document, &result).await {
            error!(path = %path_str, error = %e, "failed to commit replacements");
            return Err(e);
        }

        self.cooldown.record(path, now);
        info!(
            path = %path_str,
            replacements = result.replacements.len(),
            "replacements applied"
        );
        if self.config.show_notifications {
            self.notifier.applied(path, &result);
        }

        Ok(ProcessOutcome::Applied(result))
    }

    /// Try a rule on sample text.
    #[must_use]
    pub fn test_rule(&self, rule: &Rule, text: &str) -> RuleTestOutcome {
        test_rule(rule, text)
    }

    /// Try a rule on the built-in import samples.
    #[must_use]
    pub fn test_rule_against_samples(&self, rule: &Rule) -> Vec<SampleOutcome> {
        run_samples(rule)
    }
}
