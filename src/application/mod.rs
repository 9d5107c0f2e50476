//! Application services: the phases of a profiling run.

pub mod health;
pub mod orchestrator;
pub mod readiness;
pub mod report;
pub mod trigger;
pub mod workload;

pub use health::{health_check, HealthCheck, HealthReport, HealthStatus};
pub use orchestrator::Orchestrator;
pub use readiness::{ReadinessPolicy, ReadinessWaiter};
pub use report::{RunReport, Stage, StageFailure, StageOutcome, StageStatus};
pub use trigger::{ProfileTrigger, TriggerResult};
pub use workload::WorkloadDriver;
