//! Tests for RuleManager - save handling against an in-memory document.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reimport_engine::{
    EngineError, LineEdit, Notifier, PluginConfig, ProcessOutcome, ProcessResult, Rule,
    RuleFailure, RuleManager, TextDocument, apply_line_edits,
};

/// Document double that keeps its text in memory.
struct MemoryDocument {
    path: PathBuf,
    text: Mutex<String>,
    accept: bool,
    commits: AtomicUsize,
}

impl MemoryDocument {
    fn new(path: &str, text: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            text: Mutex::new(text.to_string()),
            accept: true,
            commits: AtomicUsize::new(0),
        }
    }

    fn rejecting(mut self) -> Self {
        self.accept = false;
        self
    }

    fn current(&self) -> String {
        self.text.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextDocument for MemoryDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn language_id(&self) -> &str {
        "go"
    }

    fn text(&self) -> String {
        self.current()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.current().split('\n').nth(line).map(str::to_string)
    }

    async fn apply_atomic_edit(&self, edits: Vec<LineEdit>) -> anyhow::Result<bool> {
        if !self.accept {
            return Ok(false);
        }
        let mut text = self.text.lock().unwrap();
        let Ok(updated) = apply_line_edits(&text, &edits) else {
            return Ok(false);
        };
        *text = updated;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

#[derive(Default)]
struct RecordingNotifier {
    applied: AtomicUsize,
    failures: AtomicUsize,
}

impl Notifier for RecordingNotifier {
    fn applied(&self, _path: &Path, _result: &ProcessResult) {
        self.applied.fetch_add(1, Ordering::SeqCst);
    }

    fn rule_failed(&self, _path: &Path, _failure: &RuleFailure) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}

const SOURCE: &str = "package main\n\nimport (\n\t\"fmt\"\n\t\"github.com/co/repo\"\n)\n\nfunc main() { fmt.Println(\"github.com/co/repo\") }\n";

fn local_rule() -> Rule {
    Rule::new("local", "github.com/co/repo", "./local/repo")
}

fn manager_with(rules: Vec<Rule>) -> RuleManager {
    RuleManager::new(PluginConfig {
        rules,
        ..PluginConfig::default()
    })
}

#[tokio::test]
async fn test_save_rewrites_import_lines_only() {
    let mut manager = manager_with(vec![local_rule()]);
    let doc = MemoryDocument::new("/src/app/main.go", SOURCE);

    let outcome = manager.process_document(&doc).await.unwrap();

    assert!(outcome.is_applied());
    let text = doc.current();
    assert!(text.contains("\t\"./local/repo\"\n"));
    // Ordinary code keeps the old path.
    assert!(text.contains("fmt.Println(\"github.com/co/repo\")"));
    assert_eq!(doc.commits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_second_save_within_cooldown_is_suppressed() {
    let mut manager = manager_with(vec![local_rule()]);
    let doc = MemoryDocument::new("/src/app/main.go", SOURCE);
    let t0 = Instant::now();

    let first = manager.process_document_at(&doc, t0).await.unwrap();
    assert!(first.is_applied());

    // Simulate the user undoing the rewrite, then saving again quickly.
    *doc.text.lock().unwrap() = SOURCE.to_string();
    let second = manager
        .process_document_at(&doc, t0 + Duration::from_secs(3))
        .await
        .unwrap();
    assert_eq!(second, ProcessOutcome::CoolingDown);
    assert_eq!(doc.commits.load(Ordering::SeqCst), 1);

    let third = manager
        .process_document_at(&doc, t0 + Duration::from_secs(6))
        .await
        .unwrap();
    assert!(third.is_applied());
}

#[tokio::test]
async fn test_expired_entries_are_swept_by_later_pass() {
    let mut manager = manager_with(vec![local_rule()]);
    let t0 = Instant::now();

    let a = MemoryDocument::new("/src/a/main.go", SOURCE);
    assert!(manager.process_document_at(&a, t0).await.unwrap().is_applied());
    assert_eq!(manager.cooldown().len(), 1);

    // B is processed after A's entry expired: only B remains tracked.
    let b = MemoryDocument::new("/src/b/main.go", SOURCE);
    let later = t0 + Duration::from_secs(301);
    assert!(manager.process_document_at(&b, later).await.unwrap().is_applied());
    assert_eq!(manager.cooldown().len(), 1);
    assert!(!manager.cooldown().is_cooling_down(Path::new("/src/a/main.go"), later));
}

#[tokio::test]
async fn test_sweep_runs_even_when_nothing_changes() {
    let mut manager = manager_with(vec![local_rule()]);
    let t0 = Instant::now();

    let a = MemoryDocument::new("/src/a/main.go", SOURCE);
    manager.process_document_at(&a, t0).await.unwrap();

    let plain = MemoryDocument::new("/src/b/main.go", "package main
");
    let outcome = manager
        .process_document_at(&plain, t0 + Duration::from_secs(301))
        .await
        .unwrap();
    assert!(matches!(outcome, ProcessOutcome::Unchanged(_)));
    assert!(manager.cooldown().is_empty());
}

#[tokio::test]
async fn test_rejected_edit_does_not_start_cooldown() {
    let mut manager = manager_with(vec![local_rule()]);
    let doc = MemoryDocument::new("/src/app/main.go", SOURCE).rejecting();
    let t0 = Instant::now();

    let err = manager.process_document_at(&doc, t0).await.unwrap_err();
    assert!(matches!(err, EngineError::Commit(_)));
    assert!(manager.cooldown().is_empty());

    let retry = manager
        .process_document_at(&doc, t0 + Duration::from_secs(1))
        .await;
    assert!(matches!(retry, Err(EngineError::Commit(_))));
}

#[tokio::test]
async fn test_exempt_path_is_left_alone() {
    let rule = local_rule().with_exempt_paths(vec!["**/vendor/**".to_string()]);
    let mut manager = manager_with(vec![rule]);
    let doc = MemoryDocument::new("/src/app/vendor/lib/main.go", SOURCE);

    let outcome = manager.process_document(&doc).await.unwrap();

    assert_eq!(
        outcome,
        ProcessOutcome::Exempt {
            rule: "local".to_string()
        }
    );
    assert_eq!(doc.current(), SOURCE);
}

#[tokio::test]
async fn test_exemption_of_one_rule_blocks_whole_file() {
    let mut manager = manager_with(vec![
        local_rule(),
        Rule::new("gen", "x", "y").with_exempt_paths(vec!["**/*_gen.go".to_string()]),
    ]);
    assert!(manager.is_exempt(Path::new("/src/api_gen.go")));

    let doc = MemoryDocument::new("/src/api_gen.go", SOURCE);
    let outcome = manager.process_document(&doc).await.unwrap();
    assert!(matches!(outcome, ProcessOutcome::Exempt { .. }));
}

#[tokio::test]
async fn test_disabled_engine_and_refresh() {
    let mut manager = RuleManager::new(PluginConfig {
        enabled: false,
        rules: vec![local_rule()],
        show_notifications: true,
    });
    let doc = MemoryDocument::new("/src/main.go", SOURCE);
    assert_eq!(
        manager.process_document(&doc).await.unwrap(),
        ProcessOutcome::Disabled
    );

    manager.refresh(PluginConfig {
        rules: vec![local_rule()],
        ..PluginConfig::default()
    });
    assert!(manager.process_document(&doc).await.unwrap().is_applied());
}

#[tokio::test]
async fn test_unchanged_document_is_not_committed() {
    let mut manager = manager_with(vec![Rule::new("other", "example.org/x", "y")]);
    let doc = MemoryDocument::new("/src/main.go", SOURCE);

    let outcome = manager.process_document(&doc).await.unwrap();
    assert!(matches!(outcome, ProcessOutcome::Unchanged(ref r) if !r.has_changes));
    assert_eq!(doc.commits.load(Ordering::SeqCst), 0);
    assert!(manager.cooldown().is_empty());
}

#[tokio::test]
async fn test_notifications_follow_config_flag() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut manager = manager_with(vec![Rule::new("broken", "", "x"), local_rule()])
        .with_notifier(notifier.clone());
    let doc = MemoryDocument::new("/src/main.go", SOURCE);

    manager.process_document(&doc).await.unwrap();
    assert_eq!(notifier.applied.load(Ordering::SeqCst), 1);
    // "import (", two specs: the broken rule fails on each import line.
    assert_eq!(notifier.failures.load(Ordering::SeqCst), 3);

    let quiet = Arc::new(RecordingNotifier::default());
    let mut manager = RuleManager::new(PluginConfig {
        enabled: true,
        rules: vec![local_rule()],
        show_notifications: false,
    })
    .with_notifier(quiet.clone());
    let doc = MemoryDocument::new("/src/other.go", SOURCE);
    assert!(manager.process_document(&doc).await.unwrap().is_applied());
    assert_eq!(quiet.applied.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stale_document_aborts_commit() {
    struct Drifting(MemoryDocument);

    #[async_trait]
    impl TextDocument for Drifting {
        fn path(&self) -> &Path {
            self.0.path()
        }
        fn language_id(&self) -> &str {
            "go"
        }
        fn text(&self) -> String {
            self.0.text()
        }
        fn line_text(&self, _line: usize) -> Option<String> {
            Some("edited meanwhile".to_string())
        }
        async fn apply_atomic_edit(&self, edits: Vec<LineEdit>) -> anyhow::Result<bool> {
            self.0.apply_atomic_edit(edits).await
        }
    }

    let mut manager = manager_with(vec![local_rule()]);
    let doc = Drifting(MemoryDocument::new("/src/main.go", SOURCE));

    let err = manager.process_document(&doc).await.unwrap_err();
    assert!(matches!(err, EngineError::Stale { line: 4, .. }));
    assert_eq!(doc.0.current(), SOURCE);
}

#[test]
fn test_rule_testing_actions() {
    let manager = manager_with(Vec::new());
    let outcome = manager.test_rule(&local_rule(), "import \"github.com/co/repo/v2\"");
    assert!(outcome.success);
    assert_eq!(outcome.result, "import \"./local/repo/v2\"");

    let samples = manager.test_rule_against_samples(&local_rule());
    assert_eq!(samples.len(), 8);
    assert!(samples.iter().all(|s| s.outcome.result.contains("./local/repo")));
}
