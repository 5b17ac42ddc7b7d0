use std::path::PathBuf;

use clap::{Parser, Subcommand};

use reimport_io::DEFAULT_SETTINGS_PATH;

#[derive(Parser)]
#[command(name = "reimport")]
#[command(about = "Rewrite Go import paths on save using literal substitution rules.")]
pub(crate) struct Cli {
    /// Settings file holding the `replace-go-import` section.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    pub(crate) settings: PathBuf,

    /// Debug logging (RUST_LOG overrides).
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Watch directories and rewrite Go files when they are saved. Ctrl+C stops.
    Watch {
        /// Directories to watch recursively (default: current directory).
        #[arg(default_value = ".")]
        roots: Vec<PathBuf>,

        /// Quiet period in milliseconds before a write counts as a save.
        #[arg(long, default_value_t = 100)]
        debounce_ms: u64,
    },
    /// Rewrite one file now, ignoring the cooldown of earlier runs.
    Run {
        /// Go source file.
        file: PathBuf,
    },
    /// Try a rule on sample text, or on the built-in import samples.
    TestRule {
        /// Literal text to replace.
        #[arg(long)]
        from: String,

        /// Replacement text.
        #[arg(long)]
        to: String,

        /// Rule label shown in output.
        #[arg(long, default_value = "test")]
        name: String,

        /// Sample text (default: built-in import samples).
        #[arg(long)]
        text: Option<String>,

        /// Print outcomes as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Validate a JSON array of rules and write it to the settings file.
    SetRules {
        /// Rules as JSON, e.g. '[{"name":"local","from":"a","to":"b","enabled":true}]'.
        rules: String,
    },
}
