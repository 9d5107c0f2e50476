//! Load generation and evaluation settings.

use serde::Deserialize;

/// Fixed parameters of the benchmark and evaluation sub-processes.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadConfig {
    /// Interpreter used for every `-m <module>` invocation.
    #[serde(default = "default_python")]
    pub python: String,
    /// `--backend` passed to the serving benchmark.
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_num_prompts")]
    pub num_prompts: u32,
    #[serde(default = "default_warmup_requests")]
    pub warmup_requests: u32,
    /// Packages installed right before the evaluation harness runs.
    #[serde(default = "default_eval_packages")]
    pub eval_packages: Vec<String>,
    #[serde(default = "default_eval_task")]
    pub eval_task: String,
    /// Number of examples the evaluation is limited to.
    #[serde(default = "default_eval_limit")]
    pub eval_limit: u32,
}

fn default_python() -> String {
    "python3".into()
}

fn default_backend() -> String {
    "sglang".into()
}

const fn default_num_prompts() -> u32 {
    128
}

const fn default_warmup_requests() -> u32 {
    5
}

fn default_eval_packages() -> Vec<String> {
    vec!["lm-eval[api]".into(), "tenacity".into()]
}

fn default_eval_task() -> String {
    "gsm8k".into()
}

const fn default_eval_limit() -> u32 {
    10
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            backend: default_backend(),
            num_prompts: default_num_prompts(),
            warmup_requests: default_warmup_requests(),
            eval_packages: default_eval_packages(),
            eval_task: default_eval_task(),
            eval_limit: default_eval_limit(),
        }
    }
}
