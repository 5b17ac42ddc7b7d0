//! Glob-style path exemptions.
//!
//! Wildcards:
//! - `**` matches any run of characters, separators included
//! - `*` matches any run of characters except `/`
//! - `?` matches exactly one character
//!
//! Everything else is literal. Patterns are anchored at both ends, so the
//! whole path has to match.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::error::RuleError;
use crate::rule::Rule;

/// Upper bound for a compiled exemption matcher.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Translate a glob into an anchored regular expression source.
#[must_use]
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 6);
    out.push_str("(?s)^");
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push('.'),
            other => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }
    out.push('$');
    out
}

/// A compiled exemption glob.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    regex: Regex,
}

impl PathPattern {
    /// Compile a glob.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Pattern`] when the translated expression cannot be
    /// compiled.
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        Self::compile(pattern, PATTERN_SIZE_LIMIT)
    }

    fn compile(pattern: &str, size_limit: usize) -> Result<Self, RuleError> {
        let regex = RegexBuilder::new(&glob_to_regex(pattern))
            .size_limit(size_limit)
            .build()
            .map_err(|e| RuleError::Pattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Glob as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether the whole `path` matches.
    #[inline]
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// One-shot match that fails closed: an uncompilable pattern never exempts.
#[must_use]
pub fn matches_path(path: &str, pattern: &str) -> bool {
    match PathPattern::new(pattern) {
        Ok(compiled) => compiled.is_match(path),
        Err(e) => {
            warn!(%pattern, error = %e, "exemption pattern rejected");
            false
        }
    }
}

/// Exemption globs of every enabled rule, compiled once per config refresh.
#[derive(Debug, Clone, Default)]
pub struct ExemptionSet {
    entries: Vec<(String, PathPattern)>,
}

impl ExemptionSet {
    /// Compile the exemptions of all enabled rules.
    ///
    /// Patterns that fail to compile are logged and left out, so they never
    /// exempt anything.
    #[must_use]
    pub fn from_rules(rules: &[Rule]) -> Self {
        let mut entries = Vec::new();
        for rule in rules.iter().filter(|rule| rule.enabled) {
            for pattern in &rule.exempt_paths {
                match PathPattern::new(pattern) {
                    Ok(compiled) => entries.push((rule.name.clone(), compiled)),
                    Err(e) => warn!(rule = %rule.name, error = %e, "exemption pattern rejected"),
                }
            }
        }
        Self { entries }
    }

    /// Name of the first rule whose exemption matches `path`.
    #[must_use]
    pub fn matching_rule(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, pattern)| pattern.is_match(path))
            .map(|(rule, _)| rule.as_str())
    }

    /// Whether any enabled rule exempts `path`.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        self.matching_rule(path).is_some()
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pattern is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
