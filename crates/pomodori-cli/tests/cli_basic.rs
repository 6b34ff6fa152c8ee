//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command with `home` as the data directory.
fn run_cli(home: &TempDir, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomodori"))
        .env("POMODORI_HOME", home.path())
        .env_remove("POMODORI_LOG")
        .args(args)
        .output()
        .expect("failed to execute pomodori");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

fn run_json(home: &TempDir, args: &[&str]) -> Value {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("output is not JSON")
}

#[test]
fn test_fresh_status() {
    let home = TempDir::new().unwrap();
    let view = run_json(&home, &["status"]);
    assert_eq!(view["session"], "focus");
    assert_eq!(view["mode"], "paused");
    assert_eq!(view["remaining_ms"], 1_500_000);
    assert_eq!(view["remaining"], "25:00");
    assert_eq!(view["session_counter"], 0);
    assert_eq!(view["resume_enabled"], false);
}

#[test]
fn test_session_selection_persists() {
    let home = TempDir::new().unwrap();
    let view = run_json(&home, &["session", "short"]);
    assert_eq!(view["session"], "short");
    assert_eq!(view["remaining_ms"], 300_000);

    let view = run_json(&home, &["status"]);
    assert_eq!(view["session"], "short");
}

#[test]
fn test_invalid_session_fails() {
    let home = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&home, &["session", "nap"]);
    assert_ne!(code, 0);
}

#[test]
fn test_durations_are_clamped() {
    let home = TempDir::new().unwrap();
    let saved = run_json(&home, &["durations", "set", "--focus", "500", "--short", "-3"]);
    assert_eq!(saved["focusMin"], 180);
    assert_eq!(saved["shortMin"], 1);
    assert_eq!(saved["longMin"], 15);

    let view = run_json(&home, &["status"]);
    assert_eq!(view["remaining_ms"], 180 * 60_000);
}

#[test]
fn test_counter_show_and_reset() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&home, &["counter", "show"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0");

    let (code, stdout, stderr) = run_cli(&home, &["counter", "reset"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "0");
    assert!(stderr.contains("Session counter reset"));
}

#[test]
fn test_resume_keeps_countdown_running() {
    let home = TempDir::new().unwrap();
    let view = run_json(&home, &["resume", "on"]);
    assert_eq!(view["resume_enabled"], true);

    let view = run_json(&home, &["start"]);
    assert_eq!(view["mode"], "playing");

    let view = run_json(&home, &["status"]);
    assert_eq!(view["mode"], "playing");
    assert!(view["remaining_ms"].as_u64().unwrap() <= 1_500_000);

    let view = run_json(&home, &["pause"]);
    assert_eq!(view["mode"], "paused");
}

#[test]
fn test_without_resume_restart_is_paused() {
    let home = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&home, &["start"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("resume is off"));

    let view = run_json(&home, &["status"]);
    assert_eq!(view["mode"], "paused");
    assert_eq!(view["remaining_ms"], 1_500_000);
}

#[test]
fn test_config_get_default() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&home, &["config", "get", "gesture.hold_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "900");
}

#[test]
fn test_config_set_persists() {
    let home = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&home, &["config", "set", "notifications.enabled", "false"]);
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(&home, &["config", "get", "notifications.enabled"]);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_config_unknown_key_fails() {
    let home = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&home, &["config", "get", "clock.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));

    let (code, _, _) = run_cli(&home, &["config", "set", "gesture.hold_ms", "soon"]);
    assert_eq!(code, 1);
}
