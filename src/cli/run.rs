//! Handler for the `run` command.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::adapter::{HttpServerClient, TokioProcessRunner};
use crate::application::{Orchestrator, RunReport, StageStatus};
use crate::cli::{output, RunArgs};
use crate::config::{RunConfig, Settings};
use crate::error::Result;

/// Apply command-line overrides on top of the loaded settings.
pub fn apply_overrides(settings: &mut Settings, args: &RunArgs) -> Result<()> {
    if let Some(ref level) = args.log_level {
        settings.logging.level = level.clone();
    }
    if args.json_logs {
        settings.logging.format = "json".to_string();
    }
    if let Some(secs) = args.poll_interval {
        settings.readiness.poll_interval_secs = secs;
    }
    if let Some(secs) = args.timeout {
        settings.readiness.timeout_secs = secs;
    }
    if args.no_diagnostics {
        settings.readiness.diagnostics = false;
    }
    settings.validate()
}

/// Execute the run command. Returns the process exit code.
pub async fn execute(args: &RunArgs) -> Result<i32> {
    let mut settings = Settings::load_optional(args.settings.as_deref())?;
    apply_overrides(&mut settings, args)?;
    settings.init_logging();

    info!(
        n_prefill = ?args.n_prefill,
        n_decode = ?args.n_decode,
        prefill_gpus = ?args.prefill_gpus,
        decode_gpus = ?args.decode_gpus,
        total_gpus = ?args.total_gpus,
        "profrun starting"
    );

    let config = RunConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid run configuration");
        e
    })?;

    let client = Arc::new(HttpServerClient::new(settings.readiness.request_timeout()));
    let runner = Arc::new(TokioProcessRunner::new());
    let orchestrator = Orchestrator::new(config, settings, client, runner);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    let report = orchestrator.run(shutdown_rx).await;
    print_summary(&report);

    info!(exit_code = report.exit_code(), "profrun stopped");
    Ok(report.exit_code())
}

fn print_summary(report: &RunReport) {
    output::section("Run summary");
    for outcome in report.outcomes() {
        let stage = outcome.stage.to_string();
        match &outcome.status {
            StageStatus::Succeeded => output::ok(&stage),
            StageStatus::Skipped(reason) => output::skip(&format!("{stage}: skipped ({reason})")),
            StageStatus::Cancelled => output::warn(&format!("{stage}: cancelled")),
            StageStatus::Failed(failures) => {
                for failure in failures {
                    output::error(&format!("{stage}: {failure}"));
                }
            }
        }
    }
    if let Some(finished) = report.finished_at() {
        output::key_value(
            "Duration",
            format!("{}s", (finished - report.started_at()).num_seconds()),
        );
    }
    output::key_value("Exit code", report.exit_code());
}
