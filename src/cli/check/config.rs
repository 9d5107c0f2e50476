use std::path::Path;

use crate::cli::output;
use crate::config::{RunConfig, Settings};
use crate::error::Result;

/// Validate environment and settings without contacting any server.
pub fn execute_config(settings_path: Option<&Path>) -> Result<()> {
    let settings = Settings::load_optional(settings_path)?;
    let config = RunConfig::from_env()?;
    let activities = config.activity_set(&settings.logs_dir);

    output::ok("Configuration is valid");
    output::section("Summary");
    output::key_value("Mode", &config.mode);
    output::key_value("Router", &config.router);
    output::key_value(
        "Workers",
        config
            .worker_targets()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    );
    output::key_value(
        "Wait order",
        config.readiness_targets().join(" → "),
    );
    output::key_value(
        "Activities",
        activities
            .activities()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
    );
    output::key_value("Output dir", activities.output_dir().display());
    output::key_value(
        "Steps",
        format!(
            "start {} for {} steps",
            config.steps.start(),
            config.steps.num_steps()
        ),
    );
    match &config.load {
        Some(load) => output::key_value(
            "Workload",
            format!(
                "isl {} osl {} concurrency {}",
                load.input_len,
                load.output_len,
                load.concurrency
                    .map_or_else(|| "default".to_string(), |c| c.to_string())
            ),
        ),
        None => output::skip("Workload disabled (not a prefill node)"),
    }
    if config.prefill_workers.is_empty() && config.decode_workers.is_empty() {
        output::warn("No worker lists configured, using local fallback worker");
    }

    Ok(())
}
