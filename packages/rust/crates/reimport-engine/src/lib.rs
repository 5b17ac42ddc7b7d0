#![allow(clippy::doc_markdown)]

//! reimport-engine - Import path rewriting for Go sources
//!
//! Rewrites import paths on save according to user-defined literal
//! substitution rules.
//!
//! # Features
//!
//! - **Rule validation**: untyped settings in, well-formed rules out
//! - **Line classification**: heuristic detection of import lines
//! - **Literal replacement**: chained per line, in declaration order
//! - **Path exemptions**: `**`, `*` and `?` globs scoped to enabled rules
//! - **Cooldown**: follow-up saves of a rewritten file are ignored
//!
//! # Architecture
//!
//! ```text
//! reimport-engine/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # EngineError, RuleError (thiserror)
//! ├── types.rs     # ReplacementResult, ProcessResult, ProcessOutcome
//! ├── rule.rs      # Rule model and validation
//! ├── config.rs    # PluginConfig and settings-document shapes
//! ├── exempt.rs    # Glob exemptions
//! ├── classify.rs  # Import line heuristic
//! ├── replace.rs   # Replacement engine
//! ├── samples.rs   # Built-in import samples for rule testing
//! ├── cooldown.rs  # Per-path cooldown
//! ├── document.rs  # Host document contract and updater
//! ├── notifier.rs  # Presentation sink
//! ├── report.rs    # Text report and diff
//! └── manager.rs   # RuleManager engine instance
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use reimport_engine::{PluginConfig, Rule, RuleManager};
//!
//! let config = PluginConfig {
//!     rules: vec![Rule::new("local", "github.com/co/repo", "./local/repo")],
//!     ..Default::default()
//! };
//! let manager = RuleManager::new(config);
//! let result = manager.process_text("import \"github.com/co/repo\"");
//! assert!(result.has_changes);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod classify;
mod config;
mod cooldown;
mod document;
mod error;
mod exempt;
mod manager;
mod notifier;
mod replace;
mod report;
mod rule;
mod samples;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use classify::is_import_line;
pub use config::{
    PluginConfig, RulesUpdate, SETTINGS_SECTION, SettingsShape, detect_shape,
    prepare_rules_update, settings_section, write_rules,
};
pub use cooldown::{CooldownTracker, DEFAULT_COOLDOWN, DEFAULT_EXPIRY};
pub use document::{LineEdit, TextDocument, apply_line_edits, build_line_edits, commit};
pub use error::{EngineError, RuleError};
pub use exempt::{ExemptionSet, PathPattern, glob_to_regex, matches_path};
pub use manager::RuleManager;
pub use notifier::{Notifier, TracingNotifier};
pub use replace::{apply_rule, process_text, test_rule};
pub use report::{format_report, generate_unified_diff};
pub use rule::{Rule, validate_rules};
pub use samples::{DEFAULT_SAMPLE_PATH, SampleCase, SampleOutcome, run_samples, sample_cases};
pub use types::{ProcessOutcome, ProcessResult, ReplacementResult, RuleFailure, RuleTestOutcome};
