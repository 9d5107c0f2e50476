//! Readiness polling configuration.

use std::time::Duration;

use serde::Deserialize;

/// How endpoints are polled before profiling starts.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessConfig {
    /// Delay between consecutive health probes (seconds).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Give up on an endpoint after this long (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-request timeout of a single health probe (seconds).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Capture process and GPU state after each failed probe.
    #[serde(default = "default_diagnostics")]
    pub diagnostics: bool,
}

const fn default_poll_interval_secs() -> u64 {
    30
}

const fn default_timeout_secs() -> u64 {
    3600 // 1 hour
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_diagnostics() -> bool {
    true
}

impl ReadinessConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            diagnostics: default_diagnostics(),
        }
    }
}
