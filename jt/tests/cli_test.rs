//! End-to-end tests for the jt binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn jt(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jt").expect("jt binary should build");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().expect("Failed to create temp dir");
    jt(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("track"))
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_shows_defaults_without_file() {
    let home = TempDir::new().expect("Failed to create temp dir");
    jt(home.path())
        .args(["config", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"poll-interval-ms\": 10000"))
        .stdout(predicate::str::contains("\"type\": \"console\""));
}

#[test]
fn test_config_reads_explicit_file() {
    let home = TempDir::new().expect("Failed to create temp dir");
    let config_path = home.path().join("tracker.yml");
    fs::write(
        &config_path,
        "tracker:\n  base-url: http://jobs.internal:8081/jobs\n  poll-interval-ms: 250\nsink:\n  type: http\n  url: http://collector:5000/api/v1/lineage\n",
    )
    .unwrap();

    jt(home.path())
        .arg("--config")
        .arg(&config_path)
        .args(["config", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://jobs.internal:8081/jobs"))
        .stdout(predicate::str::contains("\"poll-interval-ms\": 250"))
        .stdout(predicate::str::contains("\"type\": \"http\""));
}

#[test]
fn test_config_picks_up_local_file() {
    let home = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        home.path().join(".jobtracker.yml"),
        "tracker:\n  poll-interval-ms: 750\n",
    )
    .unwrap();

    jt(home.path())
        .args(["config", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"poll-interval-ms\": 750"));
}

#[test]
fn test_fetch_unreachable_endpoint_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    jt(home.path())
        .args(["fetch", "job-1", "--base-url", "http://127.0.0.1:1/jobs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch checkpoints"));
}

#[test]
fn test_fetch_prints_counts() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/jobs/job-1/checkpoints")
        .with_status(200)
        .with_body(r#"{"counts":{"completed":3,"failed":5,"in_progress":6,"restored":7,"total":4}}"#)
        .create();

    let home = TempDir::new().expect("Failed to create temp dir");
    jt(home.path())
        .args(["fetch", "job-1", "--format", "json", "--base-url"])
        .arg(format!("{}/jobs", server.url()))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 4"))
        .stdout(predicate::str::contains("\"completed\": 3"));
}

#[test]
fn test_track_rejects_zero_interval() {
    let home = TempDir::new().expect("Failed to create temp dir");
    jt(home.path())
        .args(["track", "job-1", "--interval-ms", "0", "--duration-secs", "1"])
        .assert()
        .failure();
}
