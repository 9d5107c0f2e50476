//! Run orchestration.
//!
//! Phase order: router readiness (prefill only), worker readiness,
//! profile-trigger fan-out, load/eval workload (prefill only). A readiness
//! failure ends the run; every later stage is reported on its own.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use super::readiness::{ReadinessPolicy, ReadinessWaiter};
use super::report::{RunReport, Stage, StageFailure, StageOutcome};
use super::trigger::ProfileTrigger;
use super::workload::WorkloadDriver;
use crate::adapter::StallDiagnostics;
use crate::config::{RunConfig, Settings};
use crate::domain::StartProfileRequest;
use crate::port::{ProcessRunner, ServerClient};

/// Owns a validated configuration and the ports a run talks through.
pub struct Orchestrator {
    config: RunConfig,
    settings: Settings,
    client: Arc<dyn ServerClient>,
    runner: Arc<dyn ProcessRunner>,
    policy: ReadinessPolicy,
}

impl Orchestrator {
    pub fn new(
        config: RunConfig,
        settings: Settings,
        client: Arc<dyn ServerClient>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let policy = ReadinessPolicy::from_config(&settings.readiness);
        Self {
            config,
            settings,
            client,
            runner,
            policy,
        }
    }

    /// Override the polling policy derived from the settings.
    #[must_use]
    pub fn with_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Execute the run until completion or shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> RunReport {
        let mut report = RunReport::start();
        info!(
            mode = %self.config.mode,
            router = %self.config.router,
            workers = self.config.worker_targets().len(),
            "Starting profiling run"
        );

        let readiness = self.wait_ready(&mut shutdown).await;
        let ready = !readiness.is_failed();
        report.record(readiness);
        if !ready {
            report.finish();
            return report;
        }

        report.record(self.trigger().await);

        if self.config.mode.is_prefill() {
            match &self.config.load {
                Some(load) => {
                    let driver =
                        WorkloadDriver::new(Arc::clone(&self.runner), self.settings.workload.clone());
                    for outcome in driver
                        .run(
                            &self.config.router,
                            load,
                            self.config.eval_model.as_deref(),
                            &mut shutdown,
                        )
                        .await
                    {
                        report.record(outcome);
                    }
                }
                None => warn!("Prefill mode without load shape, skipping workload"),
            }
        } else {
            info!(mode = %self.config.mode, "Not a prefill node, skipping load and evaluation");
        }

        report.finish();
        if report.was_cancelled() {
            warn!("Profiling run cancelled");
        } else if report.is_success() {
            info!("Profiling run complete");
        } else {
            error!(exit_code = report.exit_code(), "Profiling run finished with failures");
        }
        report
    }

    async fn wait_ready(&self, shutdown: &mut watch::Receiver<bool>) -> StageOutcome {
        let mut waiter = ReadinessWaiter::new(Arc::clone(&self.client), self.policy);
        if self.settings.readiness.diagnostics {
            waiter = waiter.with_diagnostics(StallDiagnostics::new(
                Arc::clone(&self.runner),
                &self.settings.logs_dir,
                &self.config.node_id,
            ));
        }

        match waiter.wait_all(&self.config.readiness_targets(), shutdown).await {
            Ok(()) => StageOutcome::succeeded(Stage::Readiness),
            Err(e) => {
                error!(error = %e, "Readiness wait failed");
                StageOutcome::failed(Stage::Readiness, vec![e.into()])
            }
        }
    }

    async fn trigger(&self) -> StageOutcome {
        let activities = self.config.activity_set(&self.settings.logs_dir);
        let mut failures: Vec<StageFailure> = Vec::new();
        // Workers are triggered even when the local directory is unusable.
        if let Err(e) = ProfileTrigger::prepare_output_dir(&activities).await {
            error!(error = %e, "Cannot prepare profile output directory");
            failures.push(e.into());
        }

        let request = StartProfileRequest::new(self.config.steps, &activities);
        failures.extend(
            ProfileTrigger::new(Arc::clone(&self.client))
                .trigger_all(&self.config.worker_targets(), &request)
                .await
                .into_iter()
                .filter_map(|result| result.outcome.err().map(StageFailure::from)),
        );
        StageOutcome::from_failures(Stage::Trigger, failures)
    }
}
