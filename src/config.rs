//! Configuration: the run inputs from the environment and the optional
//! settings file of tunables.

pub mod logging;
pub mod readiness;
pub mod run;
pub mod settings;
pub mod workload;

pub use logging::LoggingConfig;
pub use readiness::ReadinessConfig;
pub use run::{LoadShape, RouterAddress, RunConfig};
pub use settings::Settings;
pub use workload::WorkloadConfig;
