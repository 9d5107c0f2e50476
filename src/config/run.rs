//! Run configuration read from the process environment.
//!
//! Built once at startup and immutable afterwards. Empty variables are
//! treated the same as unset ones.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::warn;
use url::Url;

use crate::domain::{
    parse_address_list, ActivitySet, ProfilingMode, StepWindow, WorkerAddress, WorkerRole,
    DEFAULT_START_STEP, DEFAULT_STOP_STEP,
};
use crate::error::ConfigError;

pub const ENV_HEAD_NODE: &str = "HEAD_NODE";
pub const ENV_HEAD_PORT: &str = "HEAD_PORT";
pub const ENV_MODE: &str = "PROFILING_MODE";
pub const ENV_PROFILER_DIR: &str = "SGLANG_TORCH_PROFILER_DIR";
pub const ENV_PREFILL_IPS: &str = "PROFILE_PREFILL_IPS";
pub const ENV_DECODE_IPS: &str = "PROFILE_DECODE_IPS";
pub const ENV_CONCURRENCY: &str = "PROFILE_CONCURRENCY";
pub const ENV_ISL: &str = "PROFILE_ISL";
pub const ENV_OSL: &str = "PROFILE_OSL";
pub const ENV_START_STEP: &str = "PROFILE_START_STEP";
pub const ENV_STOP_STEP: &str = "PROFILE_STOP_STEP";
pub const ENV_NODE_ID: &str = "SLURM_NODEID";
pub const ENV_EVAL_MODEL: &str = "PROFILE_EVAL_MODEL";

const DEFAULT_HEAD_NODE: &str = "127.0.0.1";
const DEFAULT_HEAD_PORT: u16 = 8000;

/// Router endpoint that fronts the prefill/decode workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterAddress {
    host: String,
    port: u16,
}

impl RouterAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// OpenAI-compatible completions endpoint used by the evaluation harness.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/v1/completions", self.base_url())
    }
}

impl Default for RouterAddress {
    fn default() -> Self {
        Self::new(DEFAULT_HEAD_NODE, DEFAULT_HEAD_PORT)
    }
}

impl fmt::Display for RouterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Prompt shape of the synthetic load, required in prefill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadShape {
    pub input_len: u32,
    pub output_len: u32,
    /// Maximum in-flight requests; the benchmark's own default when `None`.
    pub concurrency: Option<u32>,
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub router: RouterAddress,
    pub mode: ProfilingMode,
    pub profiler_dir: Option<PathBuf>,
    pub prefill_workers: Vec<WorkerAddress>,
    pub decode_workers: Vec<WorkerAddress>,
    /// Present exactly when `mode` is prefill.
    pub load: Option<LoadShape>,
    pub steps: StepWindow,
    pub node_id: String,
    pub eval_model: Option<String>,
}

impl RunConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// - `PROFILE_ISL` or `PROFILE_OSL` missing in prefill mode
    /// - any present numeric variable that does not parse
    /// - `PROFILE_STOP_STEP` below `PROFILE_START_STEP`
    /// - a router host that does not form a valid URL
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mode = ProfilingMode::parse(get(ENV_MODE).as_deref().unwrap_or_default().trim());

        let router = RouterAddress::new(
            get(ENV_HEAD_NODE)
                .map_or_else(|| DEFAULT_HEAD_NODE.to_string(), |h| h.trim().to_string()),
            parse_var(ENV_HEAD_PORT, get(ENV_HEAD_PORT))?.unwrap_or(DEFAULT_HEAD_PORT),
        );
        Url::parse(&router.base_url()).map_err(|e| ConfigError::InvalidValue {
            field: ENV_HEAD_NODE,
            reason: e.to_string(),
        })?;

        let load = if mode.is_prefill() {
            let input_len = parse_var(ENV_ISL, get(ENV_ISL))?
                .ok_or(ConfigError::MissingField { field: ENV_ISL })?;
            let output_len = parse_var(ENV_OSL, get(ENV_OSL))?
                .ok_or(ConfigError::MissingField { field: ENV_OSL })?;
            Some(LoadShape {
                input_len,
                output_len,
                concurrency: parse_var(ENV_CONCURRENCY, get(ENV_CONCURRENCY))?,
            })
        } else {
            None
        };

        let start = match parse_var(ENV_START_STEP, get(ENV_START_STEP))? {
            Some(start) => start,
            None => {
                warn!(default = DEFAULT_START_STEP, "{ENV_START_STEP} not set, using default");
                DEFAULT_START_STEP
            }
        };
        let stop = match parse_var(ENV_STOP_STEP, get(ENV_STOP_STEP))? {
            Some(stop) => stop,
            None => {
                warn!(default = DEFAULT_STOP_STEP, "{ENV_STOP_STEP} not set, using default");
                DEFAULT_STOP_STEP
            }
        };
        let steps = StepWindow::new(start, stop).ok_or_else(|| ConfigError::InvalidValue {
            field: ENV_STOP_STEP,
            reason: format!("stop step {stop} is before start step {start}"),
        })?;

        Ok(Self {
            router,
            mode,
            profiler_dir: get(ENV_PROFILER_DIR).map(PathBuf::from),
            prefill_workers: get(ENV_PREFILL_IPS)
                .map(|raw| parse_address_list(&raw, WorkerRole::Prefill))
                .unwrap_or_default(),
            decode_workers: get(ENV_DECODE_IPS)
                .map(|raw| parse_address_list(&raw, WorkerRole::Decode))
                .unwrap_or_default(),
            load,
            steps,
            node_id: get(ENV_NODE_ID).unwrap_or_else(|| "0".to_string()),
            eval_model: get(ENV_EVAL_MODEL),
        })
    }

    /// Workers to wait on and trigger: prefill list, then decode list.
    ///
    /// Falls back to the single local worker when both lists are empty.
    #[must_use]
    pub fn worker_targets(&self) -> Vec<WorkerAddress> {
        let targets: Vec<WorkerAddress> = self
            .prefill_workers
            .iter()
            .chain(self.decode_workers.iter())
            .cloned()
            .collect();
        if targets.is_empty() {
            vec![WorkerAddress::fallback()]
        } else {
            targets
        }
    }

    /// Base URLs waited on before profiling, in wait order: the router on a
    /// prefill node, then every worker target.
    #[must_use]
    pub fn readiness_targets(&self) -> Vec<String> {
        let mut urls = Vec::new();
        if self.mode.is_prefill() {
            urls.push(self.router.base_url());
        }
        urls.extend(self.worker_targets().iter().map(WorkerAddress::base_url));
        urls
    }

    /// Activities and output directory shared by every trigger of the run.
    #[must_use]
    pub fn activity_set(&self, logs_dir: &Path) -> ActivitySet {
        ActivitySet::select(self.profiler_dir.as_deref(), logs_dir)
    }
}

fn parse_var<T>(field: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
                field,
                reason: format!("{raw:?}: {e}"),
            })
        })
        .transpose()
}
