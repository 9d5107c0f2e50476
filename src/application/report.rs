//! Per-stage run report and exit-code mapping.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::error::{ReadinessError, StageError};

/// Stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Readiness,
    Trigger,
    Benchmark,
    Install,
    Eval,
}

impl Stage {
    /// Process exit code used when this stage is the first to fail.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Readiness => 2,
            Self::Trigger => 3,
            Self::Benchmark => 4,
            Self::Install => 5,
            Self::Eval => 6,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Readiness => "readiness",
            Self::Trigger => "trigger",
            Self::Benchmark => "benchmark",
            Self::Install => "install",
            Self::Eval => "eval",
        })
    }
}

/// Why a stage failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageFailure {
    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error(transparent)]
    Call(#[from] StageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Succeeded,
    Failed(Vec<StageFailure>),
    Skipped(String),
    /// Interrupted by shutdown, or never started because of it.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StageStatus,
}

impl StageOutcome {
    pub fn succeeded(stage: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Succeeded,
        }
    }

    pub fn failed(stage: Stage, failures: Vec<StageFailure>) -> Self {
        Self {
            stage,
            status: StageStatus::Failed(failures),
        }
    }

    pub fn skipped(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped(reason.into()),
        }
    }

    pub fn cancelled(stage: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Cancelled,
        }
    }

    /// Succeeded when `failures` is empty, failed otherwise.
    pub fn from_failures(stage: Stage, failures: Vec<StageFailure>) -> Self {
        if failures.is_empty() {
            Self::succeeded(stage)
        } else {
            Self::failed(stage, failures)
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.status, StageStatus::Failed(_))
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone)]
pub struct RunReport {
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    outcomes: Vec<StageOutcome>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: StageOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    #[must_use]
    pub fn outcomes(&self) -> &[StageOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|o| o.stage == stage)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.outcomes.iter().any(StageOutcome::is_failed) && !self.was_cancelled()
    }

    /// True when shutdown interrupted any stage.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.outcomes.iter().any(|outcome| match &outcome.status {
            StageStatus::Cancelled => true,
            StageStatus::Failed(failures) => failures.iter().any(|f| {
                matches!(f, StageFailure::Readiness(ReadinessError::Cancelled { .. }))
            }),
            _ => false,
        })
    }

    /// 0 on success, 130 when cancelled, otherwise the first failed stage's code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.was_cancelled() {
            return 130;
        }
        self.outcomes
            .iter()
            .find(|o| o.is_failed())
            .map_or(0, |o| o.stage.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_failed(program: &str, code: i32) -> StageFailure {
        StageError::CommandFailed {
            program: program.to_string(),
            code: Some(code),
        }
        .into()
    }

    #[test]
    fn empty_report_is_success() {
        let report = RunReport::start();
        assert!(report.is_success());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn skipped_stages_do_not_fail_the_run() {
        let mut report = RunReport::start();
        report.record(StageOutcome::succeeded(Stage::Readiness));
        report.record(StageOutcome::skipped(Stage::Benchmark, "decode mode"));
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn first_failed_stage_sets_exit_code() {
        let mut report = RunReport::start();
        report.record(StageOutcome::succeeded(Stage::Trigger));
        report.record(StageOutcome::failed(
            Stage::Benchmark,
            vec![command_failed("python3", 1)],
        ));
        report.record(StageOutcome::failed(
            Stage::Eval,
            vec![command_failed("python3", 2)],
        ));

        assert!(!report.is_success());
        assert_eq!(report.exit_code(), 4);
    }

    #[test]
    fn cancellation_overrides_stage_code() {
        let mut report = RunReport::start();
        report.record(StageOutcome::failed(
            Stage::Readiness,
            vec![ReadinessError::Cancelled {
                url: "http://router:8000".to_string(),
            }
            .into()],
        ));

        assert!(report.was_cancelled());
        assert_eq!(report.exit_code(), 130);
    }

    #[test]
    fn cancelled_workload_stage_overrides_earlier_failure() {
        let mut report = RunReport::start();
        report.record(StageOutcome::failed(
            Stage::Benchmark,
            vec![command_failed("python3", 1)],
        ));
        report.record(StageOutcome::cancelled(Stage::Install));

        assert!(report.was_cancelled());
        assert_eq!(report.exit_code(), 130);
    }

    #[test]
    fn from_failures_picks_status() {
        assert_eq!(
            StageOutcome::from_failures(Stage::Trigger, Vec::new()).status,
            StageStatus::Succeeded
        );
        assert!(StageOutcome::from_failures(Stage::Trigger, vec![command_failed("x", 1)]).is_failed());
    }

    #[test]
    fn finish_stamps_end_time() {
        let mut report = RunReport::start();
        assert!(report.finished_at().is_none());
        report.finish();
        assert!(report.finished_at().unwrap() >= report.started_at());
    }
}
