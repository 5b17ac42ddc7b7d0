//! Literal substitution over import lines.
//!
//! Rules chain within a line: each enabled rule sees the text left by the
//! rules declared before it.

use tracing::{debug, error};

use crate::classify::is_import_line;
use crate::config::PluginConfig;
use crate::error::RuleError;
use crate::rule::Rule;
use crate::types::{ProcessResult, ReplacementResult, RuleFailure, RuleTestOutcome};

/// Apply one rule to one line.
///
/// Every occurrence of `rule.from` is replaced. The record's columns point at
/// the first occurrence only. Returns `Ok(None)` when the rule does not
/// match or the substitution leaves the line as it was.
///
/// # Errors
///
/// Returns [`RuleError::EmptySource`] when `rule.from` is blank.
pub fn apply_rule(
    line: &str,
    rule: &Rule,
    line_number: usize,
) -> Result<Option<ReplacementResult>, RuleError> {
    if rule.from.trim().is_empty() {
        return Err(RuleError::EmptySource(rule.name.clone()));
    }

    let Some(byte_start) = line.find(&rule.from) else {
        return Ok(None);
    };

    let replaced = line.replace(&rule.from, &rule.to);
    if replaced == line {
        return Ok(None);
    }

    let column_start = line[..byte_start].chars().count();
    Ok(Some(ReplacementResult {
        original_text: line.to_string(),
        replaced_text: replaced,
        rule_name: rule.name.clone(),
        line_number,
        column_start,
        column_end: column_start + rule.from.chars().count(),
    }))
}

/// Run every enabled rule over the import lines of `text`.
///
/// Lines are split on `\n`. A failing rule is recorded in
/// [`ProcessResult::failures`] and the pass moves on.
#[must_use]
pub fn process_text(config: &PluginConfig, text: &str) -> ProcessResult {
    if !config.enabled {
        return ProcessResult::unchanged();
    }

    let mut result = ProcessResult::unchanged();

    for (line_number, line) in text.split('\n').enumerate() {
        if !is_import_line(line) {
            continue;
        }

        let mut current = line.to_string();
        for rule in config.enabled_rules() {
            match apply_rule(&current, rule, line_number) {
                Ok(Some(replacement)) => {
                    debug!(rule = %rule.name, line = line_number + 1, "rule matched");
                    current.clone_from(&replacement.replaced_text);
                    result.replacements.push(replacement);
                }
                Ok(None) => {}
                Err(e) => {
                    error!(rule = %rule.name, line = line_number + 1, error = %e, "rule failed");
                    result.failures.push(RuleFailure {
                        rule_name: rule.name.clone(),
                        line_number,
                        error: e,
                    });
                }
            }
        }
    }

    result.has_changes = !result.replacements.is_empty();
    result
}

/// Apply a rule to free-form sample text, without line classification.
#[must_use]
pub fn test_rule(rule: &Rule, text: &str) -> RuleTestOutcome {
    if rule.from.trim().is_empty() {
        return RuleTestOutcome {
            success: false,
            result: text.to_string(),
            error: Some("source string is empty".to_string()),
        };
    }

    RuleTestOutcome {
        success: true,
        result: text.replace(&rule.from, &rule.to),
        error: None,
    }
}
