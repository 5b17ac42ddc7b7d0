//! Result types produced by a processing pass.

use serde::Serialize;

use crate::error::RuleError;

/// One rule firing on one line.
///
/// Columns are character offsets of the first occurrence of the rule's
/// `from` in `original_text`; every occurrence was replaced regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementResult {
    /// Line as the rule saw it.
    pub original_text: String,
    /// Line after the rule's substitution.
    pub replaced_text: String,
    /// Name of the rule that fired.
    pub rule_name: String,
    /// Line index (0-based).
    pub line_number: usize,
    /// Start of the first match (inclusive).
    pub column_start: usize,
    /// End of the first match (exclusive).
    pub column_end: usize,
}

/// A rule that failed on a line and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFailure {
    /// Rule that failed.
    pub rule_name: String,
    /// Line index (0-based).
    pub line_number: usize,
    /// What went wrong.
    #[serde(serialize_with = "serialize_display")]
    pub error: RuleError,
}

/// Aggregate of one document pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    /// Whether any line changed.
    pub has_changes: bool,
    /// Replacement records in line order, then rule order.
    pub replacements: Vec<ReplacementResult>,
    /// Rules skipped because they failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RuleFailure>,
}

impl ProcessResult {
    /// Pass that found nothing to do.
    #[must_use]
    pub fn unchanged() -> Self {
        Self::default()
    }
}

/// Outcome of testing a rule against sample text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTestOutcome {
    /// Whether the rule could be applied.
    pub success: bool,
    /// Sample text after substitution (unchanged on failure).
    pub result: String,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Where a document ended up after a save event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Engine switched off.
    Disabled,
    /// Same path processed within the cooldown window.
    CoolingDown,
    /// Path matched an enabled rule's exemption.
    Exempt {
        /// Rule whose exemption matched.
        rule: String,
    },
    /// Scanned, nothing to rewrite.
    Unchanged(ProcessResult),
    /// Rewritten and committed.
    Applied(ProcessResult),
}

impl ProcessOutcome {
    /// Whether the pass committed an edit.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

fn serialize_display<S: serde::Serializer>(error: &RuleError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}
