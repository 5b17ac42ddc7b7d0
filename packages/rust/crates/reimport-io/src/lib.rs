#![allow(clippy::doc_markdown)]

//! reimport-io - Filesystem host for reimport-engine
//!
//! Connects the rewrite engine to files on disk: safe reads, atomic
//! commits, the JSON settings file and a save watcher.
//!
//! # Features
//!
//! - **Safe reads**: size limit, NUL-byte binary detection, strict UTF-8
//!   for documents and lossy UTF-8 elsewhere
//! - **Atomic commits**: temp file in the same directory, then rename
//! - **Settings store**: nested, flat or bare-section JSON documents
//! - **Save watcher**: `notify` events filtered by `globset` and debounced
//!
//! # Architecture
//!
//! ```text
//! reimport-io/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── main.rs      # `reimport` binary
//! ├── cli.rs       # clap commands
//! ├── error.rs     # IoError (thiserror)
//! ├── detect.rs    # Binary detection, decoding, language tags
//! ├── sync.rs      # Synchronous reads
//! ├── async_io.rs  # Async reads and atomic writes
//! ├── document.rs  # FileDocument
//! ├── settings.rs  # SettingsStore
//! ├── watcher.rs   # SaveWatcher
//! └── host.rs      # Host loop and console notifier
//! ```

mod async_io;
mod detect;
mod document;
mod error;
mod host;
mod settings;
mod sync;
mod watcher;

pub use async_io::{read_source_async, read_text_safe_async, write_atomic};
pub use detect::{GO_LANGUAGE_ID, decode_buffer, decode_strict, is_binary, language_id_for};
pub use document::FileDocument;
pub use error::IoError;
pub use host::{ConsoleNotifier, Host, rule_test_report};
pub use settings::{DEFAULT_SETTINGS_PATH, SettingsStore};
pub use sync::{MAX_TEXT_BYTES, read_text_safe};
pub use watcher::{HostEvent, PathFilter, SaveEvent, SaveWatcher, WatcherConfig};
