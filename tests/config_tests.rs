mod support;

use std::io::Write;
use std::path::PathBuf;

use profrun::config::Settings;
use profrun::domain::{Activity, WorkerRole};
use profrun::error::{ConfigError, Error};
use support::env::run_config;
use tempfile::NamedTempFile;

fn settings_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp settings");
    file.write_all(contents.as_bytes())
        .expect("write temp settings");
    file
}

#[test]
fn settings_load_from_file() {
    let file = settings_file(concat!(
        "logs_dir = \"/scratch/logs\"\n",
        "\n",
        "[readiness]\n",
        "poll_interval_secs = 2\n",
        "timeout_secs = 20\n",
        "\n",
        "[workload]\n",
        "python = \"/opt/venv/bin/python\"\n",
        "eval_packages = [\"lm-eval[api]\"]\n",
    ));

    let settings = Settings::load(file.path()).expect("load settings");

    assert_eq!(settings.logs_dir, PathBuf::from("/scratch/logs"));
    assert_eq!(settings.readiness.poll_interval_secs, 2);
    assert_eq!(settings.readiness.timeout_secs, 20);
    assert_eq!(settings.readiness.request_timeout_secs, 10);
    assert_eq!(settings.workload.python, "/opt/venv/bin/python");
    assert_eq!(settings.workload.eval_packages, vec!["lm-eval[api]"]);
    assert_eq!(settings.workload.backend, "sglang");
}

#[test]
fn settings_missing_file_is_read_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = Settings::load(dir.path().join("absent.toml"));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn settings_reject_empty_interpreter() {
    let file = settings_file("[workload]\npython = \"  \"\n");
    let result = Settings::load(file.path());
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingField { field: "python" }))
    ));
}

#[test]
fn prefill_scenario_resolves_router_and_workers() {
    let config = run_config(&[
        ("PROFILING_MODE", "prefill"),
        ("HEAD_NODE", "10.0.0.9"),
        ("PROFILE_PREFILL_IPS", "10.0.0.1,10.0.0.2"),
        ("PROFILE_DECODE_IPS", ""),
        ("PROFILE_ISL", "128"),
        ("PROFILE_OSL", "64"),
    ])
    .expect("valid config");

    assert_eq!(
        config.readiness_targets(),
        vec![
            "http://10.0.0.9:8000",
            "http://10.0.0.1:30000",
            "http://10.0.0.2:30000",
        ]
    );
    let targets = config.worker_targets();
    assert!(targets.iter().all(|t| t.role() == WorkerRole::Prefill));
    assert_eq!(config.steps.start(), 0);
    assert_eq!(config.steps.num_steps(), 50);
    let load = config.load.expect("prefill load shape");
    assert_eq!((load.input_len, load.output_len), (128, 64));
    assert_eq!(load.concurrency, None);
}

#[test]
fn prefill_without_input_length_is_rejected() {
    let result = run_config(&[("PROFILING_MODE", "prefill"), ("PROFILE_OSL", "64")]);
    assert!(matches!(
        result,
        Err(ConfigError::MissingField {
            field: "PROFILE_ISL"
        })
    ));
}

#[test]
fn decode_ignores_missing_lengths() {
    let config = run_config(&[("PROFILING_MODE", "decode")]).expect("valid config");
    assert!(config.load.is_none());
    assert_eq!(config.readiness_targets(), vec!["http://127.0.0.1:30000"]);
}

#[test]
fn profiler_dir_switches_activities() {
    let logs = tempfile::tempdir().expect("temp dir");

    let default = run_config(&[]).expect("valid config");
    let set = default.activity_set(logs.path());
    assert_eq!(set.activities(), &[Activity::CudaProfiler]);
    assert_eq!(set.output_dir(), logs.path().join("profiles"));

    let traced = run_config(&[("SGLANG_TORCH_PROFILER_DIR", "/traces")]).expect("valid config");
    let set = traced.activity_set(logs.path());
    assert_eq!(
        set.activities(),
        &[Activity::Cpu, Activity::Gpu, Activity::Mem]
    );
    assert_eq!(set.output_dir(), PathBuf::from("/traces"));
}

#[test]
fn inverted_step_window_is_rejected() {
    let result = run_config(&[("PROFILE_START_STEP", "40"), ("PROFILE_STOP_STEP", "10")]);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            field: "PROFILE_STOP_STEP",
            ..
        })
    ));
}
