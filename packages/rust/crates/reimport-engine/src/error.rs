//! Error types for the import rewrite engine.
//!
//! Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Failure of a single rule against a single line or path.
///
/// Returned as a value from rule application so the aggregator can carry on
/// with the remaining rules and lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Rule reached the engine with an empty source string.
    #[error("rule \"{0}\" has an empty source string")]
    EmptySource(String),

    /// Exemption glob could not be compiled into a matcher.
    #[error("invalid exemption pattern \"{pattern}\": {reason}")]
    Pattern {
        /// Pattern as written in the configuration.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

/// Errors surfaced by document-level operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Host refused or failed to apply the atomic edit.
    #[error("host rejected the edit for {0}")]
    Commit(String),

    /// Host raised an error while applying the edit.
    #[error("host error while editing {path}: {message}")]
    Host {
        /// Document path.
        path: String,
        /// Host message.
        message: String,
    },

    /// Document changed between scan and commit.
    #[error("{path} changed at line {line} before the edit was committed")]
    Stale {
        /// Document path.
        path: String,
        /// Line index (0-based) that no longer matches.
        line: usize,
    },

    /// Settings document could not be interpreted.
    #[error("Config error: {0}")]
    Config(String),
}
