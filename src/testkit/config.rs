//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::application::ReadinessPolicy;
use crate::config::{RunConfig, Settings};

/// Millisecond polling with a generous deadline.
pub fn fast_policy() -> ReadinessPolicy {
    ReadinessPolicy {
        poll_interval: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
    }
}

/// Default settings writing under `logs_dir`, diagnostics off.
pub fn settings(logs_dir: &Path) -> Settings {
    let mut settings = Settings {
        logs_dir: logs_dir.to_path_buf(),
        ..Default::default()
    };
    settings.readiness.diagnostics = false;
    settings
}

/// Run configuration built from the given variables only.
///
/// # Panics
///
/// Panics if the variables do not form a valid configuration.
pub fn run_config(vars: &[(&str, &str)]) -> RunConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    RunConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test run config")
}
