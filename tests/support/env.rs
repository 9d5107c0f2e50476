use std::collections::HashMap;

use profrun::config::RunConfig;
use profrun::error::ConfigError;

/// Build a run configuration from the given variables only.
pub fn run_config(vars: &[(&str, &str)]) -> Result<RunConfig, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    RunConfig::from_lookup(|key| vars.get(key).cloned())
}
