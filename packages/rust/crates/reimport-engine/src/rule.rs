//! Substitution rule model and validation of raw configuration entries.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// A named literal find/replace directive.
///
/// `from` is always matched as literal text. `to` may be empty, which turns
/// the rule into a deletion. Rules are built with [`Rule::new`] or from
/// settings through [`validate_rules`], never deserialized directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Display name (trimmed, non-empty).
    pub name: String,
    /// Literal substring to find (trimmed, non-empty).
    pub from: String,
    /// Literal replacement.
    pub to: String,
    /// Glob patterns of file paths this rule exempts from processing.
    pub exempt_paths: Vec<String>,
    /// Whether the rule takes part in processing.
    pub enabled: bool,
}

impl Rule {
    /// Create an enabled rule without exemptions.
    pub fn new<N, F, T>(name: N, from: F, to: T) -> Self
    where
        N: Into<String>,
        F: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            exempt_paths: Vec::new(),
            enabled: true,
        }
    }

    /// Attach exemption globs.
    #[must_use]
    pub fn with_exempt_paths<P: Into<Vec<String>>>(mut self, patterns: P) -> Self {
        self.exempt_paths = patterns.into();
        self
    }

    /// Set the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Sanitize untyped configuration data into well-formed rules.
///
/// Entries that are not objects, have no non-empty `name` or `from` string,
/// or whose `to` is not a string are dropped with a warning. Survivors keep
/// their order. Never fails.
#[must_use]
pub fn validate_rules(raw: &Value) -> Vec<Rule> {
    let Some(entries) = raw.as_array() else {
        if !raw.is_null() {
            warn!("rules setting is not an array; ignoring it");
        }
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| validate_entry(index, entry))
        .collect()
}

fn validate_entry(index: usize, entry: &Value) -> Option<Rule> {
    let Some(obj) = entry.as_object() else {
        warn!(index, "rule is not an object; skipped");
        return None;
    };

    let Some(name) = non_empty_trimmed(obj.get("name")) else {
        warn!(index, "rule has no valid name; skipped");
        return None;
    };

    let Some(from) = non_empty_trimmed(obj.get("from")) else {
        warn!(index, rule = %name, "rule has no valid source string; skipped");
        return None;
    };

    let Some(to) = obj.get("to").and_then(Value::as_str) else {
        warn!(index, rule = %name, "rule has no valid target string; skipped");
        return None;
    };

    let exempt_paths = obj
        .get("exemptPaths")
        .and_then(Value::as_array)
        .map(|paths| {
            paths
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(Rule {
        name,
        from,
        to: to.to_string(),
        exempt_paths,
        enabled: obj.get("enabled").is_some_and(truthy),
    })
}

fn non_empty_trimmed(value: Option<&Value>) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Loose boolean coercion for hand-edited settings (`1`, `"yes"` are on;
/// `0`, `""`, `null` are off).
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
