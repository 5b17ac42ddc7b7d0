//! Presentation sink for pass results.

use std::path::Path;

use tracing::{info, warn};

use crate::types::{ProcessResult, RuleFailure};

/// Receives results for display. Nothing flows back into the engine.
pub trait Notifier: Send + Sync {
    /// A pass was committed.
    fn applied(&self, path: &Path, result: &ProcessResult);

    /// A rule failed on a line and was skipped.
    fn rule_failed(&self, path: &Path, failure: &RuleFailure);
}

/// Notifier that writes to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn applied(&self, path: &Path, result: &ProcessResult) {
        info!(
            path = %path.display(),
            replacements = result.replacements.len(),
            "applied import replacements"
        );
    }

    fn rule_failed(&self, path: &Path, failure: &RuleFailure) {
        warn!(
            path = %path.display(),
            rule = %failure.rule_name,
            line = failure.line_number + 1,
            error = %failure.error,
            "rule skipped"
        );
    }
}
