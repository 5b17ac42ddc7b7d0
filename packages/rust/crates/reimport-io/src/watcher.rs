//! Save watcher over workspace roots.
//!
//! Uses the `notify` crate for cross-platform file system monitoring and
//! turns raw events into debounced save events for the host loop.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::detect::language_id_for;
use crate::error::IoError;

/// Configuration for the save watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Directories watched recursively.
    pub roots: Vec<PathBuf>,
    /// File patterns to include (glob patterns).
    pub include: Vec<String>,
    /// File patterns to exclude.
    pub exclude: Vec<String>,
    /// Quiet period before a burst of writes counts as one save.
    pub debounce: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            include: vec!["**/*.go".to_string()],
            exclude: vec![
                "**/.git/**".to_string(),
                "**/*.tmp".to_string(),
                "**/*~".to_string(),
            ],
            debounce: Duration::from_millis(100),
        }
    }
}

impl WatcherConfig {
    /// Default patterns over the given roots.
    #[must_use]
    pub fn for_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }
}

/// Include/exclude glob filter, compiled once.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: GlobSet,
    exclude: GlobSet,
    include_all: bool,
}

impl PathFilter {
    /// Compile the patterns. Invalid globs are skipped with a warning.
    #[must_use]
    pub fn new(include: &[String], exclude: &[String]) -> Self {
        Self {
            include: build_set(include),
            exclude: build_set(exclude),
            include_all: include.is_empty(),
        }
    }

    /// Excludes win over includes; no include patterns means everything.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        if self.exclude.is_match(path) {
            return false;
        }
        self.include_all || self.include.is_match(path)
    }
}

fn build_set(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!(pattern = %pattern, error = %e, "Skipping invalid watch glob"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build glob set");
        GlobSet::empty()
    })
}

/// A file that was written and settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    /// Absolute path of the saved file.
    pub path: PathBuf,
    /// Language tag derived from the extension.
    pub language_id: String,
}

impl SaveEvent {
    /// Event for `path`, tagged by extension.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let language_id = language_id_for(&path).to_string();
        Self { path, language_id }
    }
}

/// What the watcher reports to the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A watched source file was saved.
    Saved(SaveEvent),
    /// The settings file was written.
    SettingsChanged,
    /// The underlying watcher reported an error.
    Error(String),
}

/// Running watcher. Dropping it stops the background task.
pub struct SaveWatcher {
    events: mpsc::Receiver<HostEvent>,
    stop: mpsc::Sender<()>,
}

impl SaveWatcher {
    /// Start watching `config.roots`, plus the settings file when given.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// - `IoError::NotFound` if a root does not exist
    /// - `IoError::Watch` if the OS watcher cannot be set up
    pub fn start(config: WatcherConfig, settings_path: Option<&Path>) -> Result<Self, IoError> {
        let filter = PathFilter::new(&config.include, &config.exclude);
        let (raw_tx, mut raw_rx) = mpsc::channel(256);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let _ = raw_tx.blocking_send(result);
            },
            Config::default(),
        )?;

        let mut roots = Vec::with_capacity(config.roots.len());
        for root in &config.roots {
            let root = root
                .canonicalize()
                .map_err(|_| IoError::NotFound(root.display().to_string()))?;
            watcher.watch(&root, RecursiveMode::Recursive)?;
            info!(root = %root.display(), "Watching");
            roots.push(root);
        }

        let settings = settings_path.and_then(resolve_file);
        if let Some(settings) = &settings
            && !roots.iter().any(|root| settings.starts_with(root))
            && let Some(dir) = settings.parent().filter(|dir| dir.is_dir())
        {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            debug!(dir = %dir.display(), "Watching settings directory");
        }

        let (out_tx, out_rx) = mpsc::channel(64);
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let debounce = config.debounce;

        tokio::spawn(async move {
            // Keep watcher alive for the lifetime of the task.
            let _watcher = watcher;
            let mut pending: HashMap<PathBuf, Instant> = HashMap::new();

            loop {
                let next_due = pending.values().min().copied();
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    raw = raw_rx.recv() => match raw {
                        Some(Ok(event)) => {
                            if !is_write(event.kind) {
                                continue;
                            }
                            for path in event.paths {
                                let is_settings = settings.as_deref() == Some(path.as_path());
                                if is_settings || filter.matches(&path) {
                                    pending.insert(path, Instant::now() + debounce);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            if out_tx.send(HostEvent::Error(e.to_string())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                    () = wait_until(next_due) => {
                        let now = Instant::now();
                        let due: Vec<PathBuf> = pending
                            .iter()
                            .filter(|(_, deadline)| **deadline <= now)
                            .map(|(path, _)| path.clone())
                            .collect();
                        for path in due {
                            pending.remove(&path);
                            let event = if settings.as_deref() == Some(path.as_path()) {
                                HostEvent::SettingsChanged
                            } else {
                                HostEvent::Saved(SaveEvent::new(path))
                            };
                            if out_tx.send(event).await.is_err() {
                                return;
                            }
                        }
                    }
                }
            }
            debug!("Save watcher stopped");
        });

        Ok(Self {
            events: out_rx,
            stop: stop_tx,
        })
    }

    /// Next event, or `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<HostEvent> {
        self.events.recv().await
    }

    /// Stop the background task.
    pub async fn stop(&self) {
        let _ = self.stop.send(()).await;
    }
}

/// Creates and content writes count as saves; metadata and removals do not.
fn is_write(kind: EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(modify) => !matches!(modify, ModifyKind::Metadata(_)),
        _ => false,
    }
}

/// Absolute form of a file that may not exist yet.
fn resolve_file(path: &Path) -> Option<PathBuf> {
    if let Ok(path) = path.canonicalize() {
        return Some(path);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|dir| dir.join(name))
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
