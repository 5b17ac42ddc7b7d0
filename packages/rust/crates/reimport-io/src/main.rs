//! reimport CLI: watch, run-now, rule testing and rule saving.
//!
//! Settings come from `.vscode/settings.json` by default. Override with `--settings <path>`.
//!
//! Logging: set `RUST_LOG=reimport=info` (or `warn`, `debug`) to see logs on stderr.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reimport_engine::{ProcessOutcome, Rule};
use reimport_io::{
    ConsoleNotifier, Host, SaveWatcher, SettingsStore, WatcherConfig, rule_test_report,
};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "reimport=debug,reimport_io=debug,reimport_engine=debug"
        } else {
            "reimport=info,reimport_io=info,reimport_engine=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = SettingsStore::new(cli.settings);

    match cli.command {
        Command::Watch { roots, debounce_ms } => run_watch(settings, roots, debounce_ms).await,
        Command::Run { file } => run_file(settings, file).await,
        Command::TestRule {
            from,
            to,
            name,
            text,
            json,
        } => {
            let report = rule_test_report(&Rule::new(name, from, to), text.as_deref(), json)?;
            println!("{report}");
            Ok(())
        }
        Command::SetRules { rules } => run_set_rules(&settings, &rules).await,
    }
}

async fn run_watch(
    settings: SettingsStore,
    roots: Vec<std::path::PathBuf>,
    debounce_ms: u64,
) -> Result<()> {
    let settings_path = settings.path().to_path_buf();
    let mut host = Host::new(settings, Arc::new(ConsoleNotifier))?;
    let config = WatcherConfig {
        debounce: Duration::from_millis(debounce_ms),
        ..WatcherConfig::for_roots(roots)
    };
    let watcher = SaveWatcher::start(config, Some(&settings_path))?;
    host.run(watcher).await
}

async fn run_file(settings: SettingsStore, file: std::path::PathBuf) -> Result<()> {
    let mut host = Host::new(settings, Arc::new(ConsoleNotifier))?;
    match host.run_now(&file).await? {
        ProcessOutcome::Applied(_) => {}
        ProcessOutcome::Unchanged(_) => println!("No import paths to rewrite in {}", file.display()),
        ProcessOutcome::Disabled => println!("Import rewriting is disabled"),
        ProcessOutcome::Exempt { rule } => {
            println!("{} is exempt (rule '{rule}')", file.display());
        }
        ProcessOutcome::CoolingDown => println!("{} was processed recently", file.display()),
    }
    Ok(())
}

async fn run_set_rules(settings: &SettingsStore, raw: &str) -> Result<()> {
    let rules: serde_json::Value = serde_json::from_str(raw).context("Rules must be valid JSON")?;
    anyhow::ensure!(rules.is_array(), "Rules must be a JSON array");
    let update = settings.save_rules(&rules).await?;
    println!(
        "Saved {} rule(s) to {} ({} dropped)",
        update.kept.len(),
        settings.path().display(),
        update.dropped
    );
    Ok(())
}
