//! Plain-text rendering of a pass for terminals and logs.

use std::collections::BTreeMap;
use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

use crate::types::ProcessResult;

/// Generate a unified diff between two strings.
///
/// Uses the `similar` crate for line-by-line diffing with 3 lines of context.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

/// Format a pass for display.
///
/// Lines are shown 1-based. The diff covers affected lines only.
#[must_use]
pub fn format_report(result: &ProcessResult, path: Option<&str>) -> String {
    let mut output = String::new();

    if let Some(p) = path {
        let _ = writeln!(output, "// REWRITE: {p}");
    }
    let _ = writeln!(output, "// Replacements: {}", result.replacements.len());

    if !result.has_changes {
        output.push_str("[No matches found]\n");
    } else {
        output.push_str("\n// Changes:\n");
        for r in &result.replacements {
            let _ = writeln!(
                output,
                "L{} [{}]: \"{}\" -> \"{}\"",
                r.line_number + 1,
                r.rule_name,
                r.original_text.trim(),
                r.replaced_text.trim()
            );
        }

        let mut lines: BTreeMap<usize, (&str, &str)> = BTreeMap::new();
        for r in &result.replacements {
            lines
                .entry(r.line_number)
                .and_modify(|(_, after)| *after = r.replaced_text.as_str())
                .or_insert((r.original_text.as_str(), r.replaced_text.as_str()));
        }
        let before: String = lines.values().map(|(b, _)| format!("{b}\n")).collect();
        let after: String = lines.values().map(|(_, a)| format!("{a}\n")).collect();

        output.push_str("\n// Diff:\n");
        output.push_str(&generate_unified_diff(&before, &after));
    }

    if !result.failures.is_empty() {
        output.push_str("\n// Skipped rules:\n");
        for f in &result.failures {
            let _ = writeln!(output, "L{} [{}]: {}", f.line_number + 1, f.rule_name, f.error);
        }
    }

    output
}
