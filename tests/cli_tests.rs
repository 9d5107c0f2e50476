//! CLI integration tests.

mod support;

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use support::server::{unused_port, FakeServer};

/// Binary with an empty environment so host variables cannot leak in.
fn profrun() -> Command {
    let mut cmd = cargo_bin_cmd!("profrun");
    cmd.env_clear();
    cmd
}

fn write_settings(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("profrun.toml");
    let contents = format!(
        "logs_dir = {:?}\n\n[readiness]\npoll_interval_secs = 1\ntimeout_secs = 5\ndiagnostics = false\n{extra}",
        dir.display().to_string()
    );
    fs::write(&path, contents).expect("write settings");
    path
}

async fn run_blocking(mut cmd: Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("run profrun"))
        .await
        .expect("join blocking command")
}

#[test]
fn test_help() {
    profrun()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("profrun"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_version() {
    profrun()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("profrun"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_exits_one_when_prefill_lengths_missing() {
    let router = FakeServer::start().await;
    let worker = FakeServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let settings = write_settings(dir.path(), "");

    let mut cmd = profrun();
    cmd.args(["run", "1", "1", "8", "8", "16", "--settings"])
        .arg(&settings)
        .env("PROFILING_MODE", "prefill")
        .env("HEAD_PORT", router.port().to_string())
        .env("PROFILE_PREFILL_IPS", worker.address())
        .env("PROFILE_OSL", "64");

    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("PROFILE_ISL"));
    assert!(router.requests().is_empty());
    assert!(worker.requests().is_empty());
}

#[test]
fn run_rejects_invalid_overrides() {
    profrun()
        .args(["run", "--poll-interval", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("poll_interval_secs"));
}

#[test]
fn check_config_summarizes_environment() {
    profrun()
        .args(["check", "config"])
        .env("PROFILING_MODE", "decode")
        .env("PROFILE_DECODE_IPS", "10.0.0.3, 10.0.0.4:31000")
        .env("SGLANG_TORCH_PROFILER_DIR", "/traces")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("10.0.0.3:30000"))
        .stdout(predicate::str::contains("10.0.0.4:31000"))
        .stdout(predicate::str::contains("CPU,GPU,MEM"));
}

#[test]
fn check_config_rejects_malformed_settings() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[readiness\n").expect("write settings");

    profrun()
        .args(["check", "config", "--settings"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse settings"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_decode_node_triggers_worker_and_exits_zero() {
    let worker = FakeServer::scripted(vec![503], 200).await;
    let dir = tempfile::tempdir().expect("temp dir");
    let settings = write_settings(dir.path(), "");
    let traces = dir.path().join("traces");

    let mut cmd = profrun();
    cmd.args(["run", "--settings"])
        .arg(&settings)
        .env("PROFILING_MODE", "decode")
        .env("HEAD_PORT", unused_port().to_string())
        .env("PROFILE_DECODE_IPS", worker.address())
        .env("SGLANG_TORCH_PROFILER_DIR", &traces)
        .env("PROFILE_START_STEP", "0")
        .env("PROFILE_STOP_STEP", "20");

    let output = run_blocking(cmd).await;

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(worker.health_probes(), 2);
    assert_eq!(
        worker.profile_bodies(),
        vec![json!({
            "start_step": "0",
            "num_steps": 20,
            "activities": ["CPU", "GPU", "MEM"],
        })]
    );
    assert!(traces.is_dir());
}

#[tokio::test(flavor = "multi_thread")]
async fn run_exits_two_when_worker_never_ready() {
    let dir = tempfile::tempdir().expect("temp dir");
    let settings = write_settings(dir.path(), "");

    let mut cmd = profrun();
    cmd.args(["run", "--settings"])
        .arg(&settings)
        .args(["--timeout", "1"])
        .env("PROFILING_MODE", "decode")
        .env("PROFILE_DECODE_IPS", format!("127.0.0.1:{}", unused_port()));

    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_health_passes_against_live_worker() {
    let worker = FakeServer::start().await;

    let mut cmd = profrun();
    cmd.args(["check", "health"])
        .env("PROFILING_MODE", "decode")
        .env("HEAD_PORT", unused_port().to_string())
        .env("PROFILE_DECODE_IPS", worker.address());

    let output = run_blocking(cmd).await;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Health check passed"));
    assert_eq!(worker.health_probes(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn check_health_fails_when_worker_down() {
    let mut cmd = profrun();
    cmd.args(["check", "health"])
        .env("PROFILING_MODE", "decode")
        .env("PROFILE_DECODE_IPS", format!("127.0.0.1:{}", unused_port()));

    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("health check failed"));
}
