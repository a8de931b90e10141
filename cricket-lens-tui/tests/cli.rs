#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Runs the binary with an isolated, empty config and an address nothing listens on.
fn cricket_lens() -> (Command, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let mut cmd = Command::cargo_bin("cricket-lens").expect("binary should compile");
    cmd.env("CRICKET_LENS_CONFIG", dir.path().join("config.toml"))
        .env_remove("CRICKET_LENS_API_URL")
        .arg("--api-url")
        .arg("http://127.0.0.1:9");
    (cmd, dir)
}

#[test]
fn completions_print_script() {
    let (mut cmd, _dir) = cricket_lens();
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("cricket-lens"));
}

#[test]
fn show_rejects_non_positive_game_id() {
    let (mut cmd, _dir) = cricket_lens();
    cmd.arg("show")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid game id 0"));
}

#[test]
fn export_rejects_unknown_format() {
    let (mut cmd, _dir) = cricket_lens();
    cmd.arg("export")
        .arg("1")
        .arg("--format")
        .arg("xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format: xml"));
}

#[test]
fn health_fails_without_backend() {
    let (mut cmd, _dir) = cricket_lens();
    cmd.arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("backend unhealthy"));
}

#[test]
fn games_fails_without_backend() {
    let (mut cmd, _dir) = cricket_lens();
    cmd.arg("games").assert().failure().stderr(predicate::str::contains("HTTP error"));
}

#[test]
fn init_config_writes_defaults_once() {
    let (mut cmd, dir) = cricket_lens();
    cmd.arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let written = std::fs::read_to_string(dir.path().join("config.toml")).expect("config should be written");
    assert!(written.contains("base_url = \"http://localhost:8000\""));

    let (mut again, _other) = cricket_lens();
    again
        .env("CRICKET_LENS_CONFIG", dir.path().join("config.toml"))
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
