//! Tunables loaded from an optional TOML settings file.
//!
//! Every field has a default, so a run without `--settings` behaves exactly
//! like one with an empty file.
//!
//! ```toml
//! logs_dir = "/logs"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [readiness]
//! poll_interval_secs = 30
//! timeout_secs = 3600
//!
//! [workload]
//! num_prompts = 128
//! eval_task = "gsm8k"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::readiness::ReadinessConfig;
use super::workload::WorkloadConfig;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Health polling behaviour.
    #[serde(default)]
    pub readiness: ReadinessConfig,

    /// Benchmark and evaluation parameters.
    #[serde(default)]
    pub workload: WorkloadConfig,

    /// Root for diagnostic dumps and the default profile directory.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("/logs")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            readiness: ReadinessConfig::default(),
            workload: WorkloadConfig::default(),
            logs_dir: default_logs_dir(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Check value ranges. Also run after CLI overrides are applied.
    pub fn validate(&self) -> Result<()> {
        let readiness = &self.readiness;
        if readiness.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if readiness.timeout_secs < readiness.poll_interval_secs {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be >= poll_interval_secs".to_string(),
            }
            .into());
        }
        if readiness.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let workload = &self.workload;
        if workload.python.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "python" }.into());
        }
        if workload.num_prompts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "num_prompts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if workload.eval_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "eval_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
