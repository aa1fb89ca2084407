//! Error scenario integration tests

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn visit_scribe_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_visit-scribe"))
}

fn sandboxed(home: &Path) -> Command {
    let mut cmd = visit_scribe_bin();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("VISIT_SCRIBE_URL");
    cmd
}

fn data_dir_arg(home: &Path) -> String {
    home.join("visits").to_string_lossy().to_string()
}

fn write_audio(home: &Path, name: &str) -> String {
    let path = home.join(name);
    std::fs::write(&path, b"fake audio bytes").unwrap();
    path.to_string_lossy().to_string()
}

fn first_short_id(home: &Path, data_dir: &str) -> String {
    let output = sandboxed(home)
        .args(["--data-dir", data_dir, "list"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let listing = String::from_utf8_lossy(&output.stdout).to_string();
    let id: String = listing.chars().take(8).collect();
    assert_eq!(id.len(), 8, "list output: {}", listing);
    id
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = sandboxed(home.path())
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("Unknown key") && stderr.contains("service_url"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = sandboxed(home.path())
        .args(["config", "set", "unknown_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("Unknown key"));
}

#[test]
fn config_set_invalid_url() {
    let home = TempDir::new().unwrap();
    let output = sandboxed(home.path())
        .args(["config", "set", "service_url", "not a url"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("Invalid URL") || stderr.contains("Invalid config value"),
        "Expected URL validation error, got: {}",
        stderr
    );
}

#[test]
fn config_set_rejects_relative_data_dir() {
    let home = TempDir::new().unwrap();
    let output = sandboxed(home.path())
        .args(["config", "set", "data_dir", "relative/visits"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("absolute"));
}

#[test]
fn add_missing_file_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    let data = data_dir_arg(home.path());
    let output = sandboxed(home.path())
        .args(["--data-dir", &data, "add", "/nonexistent/visit.mp4"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("not found"));
}

#[test]
fn add_rejects_unsupported_extensions() {
    let home = TempDir::new().unwrap();
    let data = data_dir_arg(home.path());
    let notes = home.path().join("notes.txt");
    std::fs::write(&notes, b"not audio").unwrap();

    let output = sandboxed(home.path())
        .args(["--data-dir", &data, "add", &notes.to_string_lossy()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Unsupported audio format"));
}

#[test]
fn show_unknown_id_fails() {
    let home = TempDir::new().unwrap();
    let data = data_dir_arg(home.path());
    let output = sandboxed(home.path())
        .args(["--data-dir", &data, "show", "deadbeef"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("No recording matches"));
}

#[test]
fn transcribe_refuses_an_unnamed_recording() {
    let home = TempDir::new().unwrap();
    let data = data_dir_arg(home.path());
    let file = write_audio(home.path(), "bedside.m4a");

    let added = sandboxed(home.path())
        .args(["--data-dir", &data, "add", &file, "--no-transcribe"])
        .output()
        .expect("Failed to execute command");
    assert!(added.status.success());

    let id = first_short_id(home.path(), &data);
    let output = sandboxed(home.path())
        .args(["--data-dir", &data, "transcribe", &id])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("no name"));
}

#[test]
fn unreachable_service_fails_the_attempt_and_rename_resets_it() {
    let home = TempDir::new().unwrap();
    let data = data_dir_arg(home.path());
    let file = write_audio(home.path(), "checkup.mp3");

    // Nothing listens on port 1, so the upload fails fast
    let output = sandboxed(home.path())
        .env("VISIT_SCRIBE_URL", "http://127.0.0.1:1")
        .args(["--data-dir", &data, "add", &file, "--name", "Visit A"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Connection Error"));

    let listing = sandboxed(home.path())
        .args(["--data-dir", &data, "list"])
        .output()
        .expect("Failed to execute command");
    assert!(String::from_utf8_lossy(&listing.stdout).contains("Failed: Connection Error"));

    // A failed recording has no transcript to export
    let id = first_short_id(home.path(), &data);
    let export = sandboxed(home.path())
        .args(["--data-dir", &data, "export", &id])
        .output()
        .expect("Failed to execute command");
    assert!(!export.status.success());
    assert!(stderr_of(&export).contains("no completed transcript"));

    // Renaming it clears the failure so the next attempt starts fresh
    let rename = sandboxed(home.path())
        .args(["--data-dir", &data, "rename", &id, "Visit A again"])
        .output()
        .expect("Failed to execute command");
    assert!(rename.status.success());
    assert!(stderr_of(&rename).contains("Status reset to Pending Transcription"));
}
