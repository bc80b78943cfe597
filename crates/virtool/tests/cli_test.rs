//! Integration tests for the `virtool` CLI binary.
//!
//! Argument parsing, help output, shell completions, config handling and
//! input validation, all without a live Virtool server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `virtool` binary with env isolation.
///
/// Config directories point into `home` so tests never touch the user's
/// real configuration.
fn virtool_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("virtool");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("VIRTOOL_PROFILE")
        .env_remove("VIRTOOL_SERVER")
        .env_remove("VIRTOOL_USERNAME")
        .env_remove("VIRTOOL_PASSWORD")
        .env_remove("VIRTOOL_OUTPUT")
        .env_remove("VIRTOOL_INSECURE")
        .env_remove("VIRTOOL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = virtool_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    virtool_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("Virtool")
            .and(predicate::str::contains("refs"))
            .and(predicate::str::contains("otus"))
            .and(predicate::str::contains("groups")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    virtool_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("virtool"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    virtool_cmd(&home)
        .arg("frobnicate")
        .assert()
        .failure()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    virtool_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    virtool_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    let home = TempDir::new().unwrap();
    virtool_cmd(&home)
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_list_without_server_fails() {
    let home = TempDir::new().unwrap();
    let output = virtool_cmd(&home).args(["refs", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No server configured"),
        "Expected config error in output:\n{text}"
    );
}

#[test]
fn test_unknown_profile_fails() {
    let home = TempDir::new().unwrap();
    let output = virtool_cmd(&home)
        .args(["--profile", "nowhere", "refs", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("nowhere"));
}

#[test]
fn test_config_set_then_profiles() {
    let home = TempDir::new().unwrap();
    virtool_cmd(&home)
        .args(["config", "set", "server", "http://localhost:9950"])
        .assert()
        .success();

    virtool_cmd(&home)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));

    virtool_cmd(&home)
        .args(["--output", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:9950"));
}

#[test]
fn test_config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = virtool_cmd(&home)
        .args(["config", "set", "colour", "red"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unknown config key"));
}

#[test]
fn test_config_use_missing_profile() {
    let home = TempDir::new().unwrap();
    virtool_cmd(&home)
        .args(["config", "use", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

// ── Input validation ────────────────────────────────────────────────

#[test]
fn test_group_name_with_space_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    let output = virtool_cmd(&home)
        .args([
            "--server",
            "http://127.0.0.1:9",
            "groups",
            "create",
            "lab manager",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("may not contain spaces"),
        "Expected validation error in output:\n{text}"
    );
}

#[test]
fn test_remove_requires_yes_when_not_interactive() {
    let home = TempDir::new().unwrap();
    let output = virtool_cmd(&home)
        .args(["--server", "http://127.0.0.1:9", "refs", "remove", "abc123"])
        .write_stdin("")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("confirmation"));
}

#[test]
fn test_otu_edit_rejects_malformed_schema() {
    let home = TempDir::new().unwrap();
    let output = virtool_cmd(&home)
        .args([
            "--server",
            "http://127.0.0.1:9",
            "otus",
            "edit",
            "otu1",
            "--schema",
            "RNA1",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("schema"));
}
