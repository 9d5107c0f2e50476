use std::path::Path;

use crate::adapter::HttpServerClient;
use crate::application::{health_check, HealthStatus};
use crate::cli::output;
use crate::config::{RunConfig, Settings};
use crate::error::{Error, Result};

/// Probe the router and every worker once.
pub async fn execute_health(settings_path: Option<&Path>) -> Result<()> {
    let settings = Settings::load_optional(settings_path)?;
    let config = RunConfig::from_env()?;
    let client = HttpServerClient::new(settings.readiness.request_timeout());

    let report = health_check(&config, &client).await;

    output::section("Health check");
    for check in report.checks() {
        let line = format!(
            "{} ({}){}",
            check.name(),
            check.url(),
            if check.critical() { " (critical)" } else { "" }
        );
        match check.status() {
            HealthStatus::Healthy => output::ok(&line),
            HealthStatus::Unhealthy(reason) if check.critical() => {
                output::error(&format!("{line}: {reason}"));
            }
            HealthStatus::Unhealthy(reason) => output::warn(&format!("{line}: {reason}")),
        }
    }

    if !report.is_healthy() {
        return Err(Error::Connection("health check failed".to_string()));
    }
    output::ok("Health check passed");
    Ok(())
}
