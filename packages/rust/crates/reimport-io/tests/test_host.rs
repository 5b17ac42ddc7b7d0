//! Tests for the Host - save handling and settings reloads on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reimport_engine::{ProcessOutcome, Rule, TracingNotifier};
use reimport_io::{Host, SaveEvent, SettingsStore, rule_test_report};
use serde_json::json;
use tempfile::TempDir;

const SOURCE: &str = "package main\n\nimport \"github.com/co/repo/api\"\n";

fn write_settings(path: &Path, enabled: bool) {
    fs::write(
        path,
        json!({
            "replace-go-import.enabled": enabled,
            "replace-go-import.rules": [
                {"name": "local", "from": "github.com/co/repo", "to": "./repo", "enabled": true,
                 "exemptPaths": ["**/testdata/**"]}
            ]
        })
        .to_string(),
    )
    .unwrap();
}

fn setup(enabled: bool) -> (TempDir, PathBuf, Host) {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("settings.json");
    write_settings(&settings, enabled);
    let host = Host::new(SettingsStore::new(&settings), Arc::new(TracingNotifier)).unwrap();
    (dir, settings, host)
}

#[tokio::test]
async fn test_run_now_rewrites_file() {
    let (dir, _, mut host) = setup(true);
    let file = dir.path().join("main.go");
    fs::write(&file, SOURCE).unwrap();

    let outcome = host.run_now(&file).await.unwrap();

    assert!(outcome.is_applied());
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "package main\n\nimport \"./repo/api\"\n"
    );
}

#[tokio::test]
async fn test_run_now_rejects_non_go_file() {
    let (dir, _, mut host) = setup(true);
    let file = dir.path().join("notes.txt");
    fs::write(&file, SOURCE).unwrap();

    assert!(host.run_now(&file).await.is_err());
    assert_eq!(fs::read_to_string(&file).unwrap(), SOURCE);
}

#[tokio::test]
async fn test_save_of_non_go_file_is_ignored() {
    let (dir, _, mut host) = setup(true);
    let file = dir.path().join("go.mod");
    fs::write(&file, "module x\n").unwrap();

    let outcome = host.handle_save(&SaveEvent::new(file)).await.unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn test_repeated_save_hits_cooldown() {
    let (dir, _, mut host) = setup(true);
    let file = dir.path().join("main.go");
    fs::write(&file, SOURCE).unwrap();
    let event = SaveEvent::new(file);

    let first = host.handle_save(&event).await.unwrap();
    assert!(first.is_some_and(|o| o.is_applied()));

    // The engine's own write shows up as another save.
    let second = host.handle_save(&event).await.unwrap();
    assert_eq!(second, Some(ProcessOutcome::CoolingDown));
}

#[tokio::test]
async fn test_exempt_directory_is_untouched() {
    let (dir, _, mut host) = setup(true);
    let testdata = dir.path().join("testdata");
    fs::create_dir_all(&testdata).unwrap();
    let file = testdata.join("fixture.go");
    fs::write(&file, SOURCE).unwrap();

    let outcome = host.handle_save(&SaveEvent::new(file.clone())).await.unwrap();
    assert!(matches!(outcome, Some(ProcessOutcome::Exempt { .. })));
    assert_eq!(fs::read_to_string(&file).unwrap(), SOURCE);
}

#[tokio::test]
async fn test_settings_reload_switches_engine() {
    let (dir, settings, mut host) = setup(false);
    let file = dir.path().join("main.go");
    fs::write(&file, SOURCE).unwrap();
    let event = SaveEvent::new(file);

    assert_eq!(
        host.handle_save(&event).await.unwrap(),
        Some(ProcessOutcome::Disabled)
    );

    write_settings(&settings, true);
    host.reload_settings().unwrap();
    assert!(host.manager().config().enabled);
    assert!(host.handle_save(&event).await.unwrap().is_some_and(|o| o.is_applied()));
}

#[tokio::test]
async fn test_bad_settings_keep_previous_rules() {
    let (_dir, settings, mut host) = setup(true);
    fs::write(&settings, "not json").unwrap();

    assert!(host.reload_settings().is_err());
    assert_eq!(host.manager().config().rules.len(), 1);
}

#[tokio::test]
async fn test_save_of_non_utf8_file_fails_without_writing() {
    let (dir, _, mut host) = setup(true);
    let file = dir.path().join("legacy.go");
    let original: &[u8] = b"import \"github.com/co/repo/api\"\n// caf\xE9\n";
    fs::write(&file, original).unwrap();

    assert!(host.handle_save(&SaveEvent::new(file.clone())).await.is_err());
    assert_eq!(fs::read(&file).unwrap(), original);
    assert!(host.manager().cooldown().is_empty());
}

#[test]
fn test_rule_report_needs_no_settings() {
    let rule = Rule::new("local", "github.com/co/repo", "./repo");

    let single = rule_test_report(&rule, Some("import \"github.com/co/repo/api\""), false).unwrap();
    assert_eq!(single, "import \"./repo/api\"");

    let samples = rule_test_report(&rule, None, false).unwrap();
    let headers = samples.lines().filter(|l| l.starts_with("// ")).count();
    assert_eq!(headers, 8);
    assert!(samples.contains("./repo"));

    let json: serde_json::Value =
        serde_json::from_str(&rule_test_report(&rule, None, true).unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(8));
}

#[test]
fn test_rule_report_surfaces_rule_errors() {
    let broken = Rule::new("broken", "", "x");
    assert!(rule_test_report(&broken, Some("import \"fmt\""), false).is_err());
}
