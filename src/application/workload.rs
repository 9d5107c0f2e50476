//! Load generation and evaluation against the router.
//!
//! Runs in prefill mode only: a serving benchmark, an install of the
//! evaluation harness, then a short evaluation over the completions API.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use super::readiness::shutdown_requested;
use super::report::{Stage, StageOutcome};
use crate::config::{LoadShape, RouterAddress, WorkloadConfig};
use crate::port::{CommandSpec, ProcessRunner};

/// Drives the external benchmark and evaluation tools.
#[derive(Clone)]
pub struct WorkloadDriver {
    runner: Arc<dyn ProcessRunner>,
    config: WorkloadConfig,
}

impl WorkloadDriver {
    pub fn new(runner: Arc<dyn ProcessRunner>, config: WorkloadConfig) -> Self {
        Self { runner, config }
    }

    /// Random-dataset serving benchmark against the router.
    #[must_use]
    pub fn benchmark_command(&self, router: &RouterAddress, load: &LoadShape) -> CommandSpec {
        let mut args = vec![
            "-m".to_string(),
            "sglang.bench_serving".to_string(),
            "--backend".to_string(),
            self.config.backend.clone(),
            "--base-url".to_string(),
            router.base_url(),
            "--dataset-name".to_string(),
            "random".to_string(),
            "--num-prompts".to_string(),
            self.config.num_prompts.to_string(),
        ];
        if let Some(concurrency) = load.concurrency {
            args.extend(["--max-concurrency".to_string(), concurrency.to_string()]);
        }
        args.extend([
            "--random-input-len".to_string(),
            load.input_len.to_string(),
            "--random-output-len".to_string(),
            load.output_len.to_string(),
            "--random-range-ratio".to_string(),
            "1".to_string(),
            "--warmup-requests".to_string(),
            self.config.warmup_requests.to_string(),
        ]);
        CommandSpec::new(self.config.python.clone(), args)
    }

    /// Install of the evaluation harness and its helper packages.
    #[must_use]
    pub fn install_command(&self) -> CommandSpec {
        let mut args = vec!["-m".to_string(), "pip".to_string(), "install".to_string()];
        args.extend(self.config.eval_packages.iter().cloned());
        CommandSpec::new(self.config.python.clone(), args)
    }

    /// Short evaluation against the router's completions endpoint.
    #[must_use]
    pub fn eval_command(&self, router: &RouterAddress, model: Option<&str>) -> CommandSpec {
        let mut model_args = format!("base_url={}", router.completions_url());
        if let Some(model) = model {
            model_args.push_str(&format!(",model={model}"));
        }
        model_args.push_str(",tokenized_requests=False");

        CommandSpec::new(
            self.config.python.clone(),
            [
                "-m".to_string(),
                "lm_eval".to_string(),
                "--model".to_string(),
                "local-completions".to_string(),
                "--tasks".to_string(),
                self.config.eval_task.clone(),
                "--model_args".to_string(),
                model_args,
                "--limit".to_string(),
                self.config.eval_limit.to_string(),
            ],
        )
    }

    /// Run benchmark, install and eval in order.
    ///
    /// A failed benchmark still lets the eval run; a failed install skips it.
    /// Shutdown kills the running step and cancels the rest.
    pub async fn run(
        &self,
        router: &RouterAddress,
        load: &LoadShape,
        model: Option<&str>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Vec<StageOutcome> {
        let benchmark = self
            .step(Stage::Benchmark, &self.benchmark_command(router, load), shutdown)
            .await;
        let install = self
            .step(Stage::Install, &self.install_command(), shutdown)
            .await;

        let eval = if install.is_failed() {
            warn!("Skipping evaluation after failed install");
            StageOutcome::skipped(Stage::Eval, "install failed")
        } else {
            self.step(Stage::Eval, &self.eval_command(router, model), shutdown)
                .await
        };

        vec![benchmark, install, eval]
    }

    async fn step(
        &self,
        stage: Stage,
        command: &CommandSpec,
        shutdown: &mut watch::Receiver<bool>,
    ) -> StageOutcome {
        if *shutdown.borrow() {
            warn!(stage = %stage, "Shutdown requested, not starting");
            return StageOutcome::cancelled(stage);
        }

        info!(stage = %stage, command = %command, "Running");
        let result = tokio::select! {
            result = self.runner.run(command) => result,
            () = shutdown_requested(shutdown) => {
                warn!(stage = %stage, "Shutdown requested, stopping");
                return StageOutcome::cancelled(stage);
            }
        };
        // A child killed by the same interrupt reports a failure of its own.
        if *shutdown.borrow() {
            warn!(stage = %stage, "Shutdown requested while running");
            return StageOutcome::cancelled(stage);
        }

        match result.and_then(|output| output.check(&command.program)) {
            Ok(_) => {
                info!(stage = %stage, "Completed");
                StageOutcome::succeeded(stage)
            }
            Err(e) => {
                error!(stage = %stage, error = %e, "Failed");
                StageOutcome::failed(stage, vec![e.into()])
            }
        }
    }
}
