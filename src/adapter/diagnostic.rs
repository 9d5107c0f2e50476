//! Stall diagnostics captured while an endpoint is not ready.
//!
//! Takes a CPU snapshot with `top`, finds the first GPU compute process via
//! `nvidia-smi` and writes a `py-spy` stack dump of it under the logs
//! directory. Every step is best effort.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::port::{CommandSpec, ProcessRunner};

/// Lines of `top` output kept in the log.
const TOP_LINES: usize = 20;

/// What a diagnostics pass managed to collect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticSnapshot {
    pub top: Option<String>,
    pub gpu_pid: Option<u32>,
    pub dump: Option<PathBuf>,
}

/// Collects process state for a stalled readiness wait.
#[derive(Clone)]
pub struct StallDiagnostics {
    runner: Arc<dyn ProcessRunner>,
    dump_path: PathBuf,
}

impl StallDiagnostics {
    /// Dumps go to `<logs_dir>/py-spy-dump-<node_id>.txt`.
    pub fn new(runner: Arc<dyn ProcessRunner>, logs_dir: &Path, node_id: &str) -> Self {
        Self {
            runner,
            dump_path: logs_dir.join(format!("py-spy-dump-{node_id}.txt")),
        }
    }

    /// Run one diagnostics pass. Failures are logged and skipped.
    pub async fn collect(&self) -> DiagnosticSnapshot {
        let mut snapshot = DiagnosticSnapshot {
            top: self.cpu_snapshot().await,
            ..Default::default()
        };
        if let Some(top) = &snapshot.top {
            info!("CPU snapshot:\n{top}");
        }

        snapshot.gpu_pid = self.first_gpu_pid().await;
        let Some(pid) = snapshot.gpu_pid else {
            warn!("No GPU compute process found, skipping stack dump");
            return snapshot;
        };

        snapshot.dump = self.stack_dump(pid).await;
        snapshot
    }

    async fn cpu_snapshot(&self) -> Option<String> {
        let spec = CommandSpec::new("top", ["-b", "-n", "1"]).captured();
        let stdout = self.capture(&spec).await?;
        Some(stdout.lines().take(TOP_LINES).collect::<Vec<_>>().join("\n"))
    }

    async fn first_gpu_pid(&self) -> Option<u32> {
        let spec = CommandSpec::new(
            "nvidia-smi",
            ["--query-compute-apps=pid", "--format=csv,noheader"],
        )
        .captured();
        let stdout = self.capture(&spec).await?;
        parse_first_pid(&stdout)
    }

    async fn stack_dump(&self, pid: u32) -> Option<PathBuf> {
        let pid = pid.to_string();
        let spec = CommandSpec::new("py-spy", ["dump", "--pid", pid.as_str()]).captured();
        let stdout = self.capture(&spec).await?;

        if let Some(parent) = self.dump_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!(path = %parent.display(), error = %e, "Failed to create dump directory");
                return None;
            }
        }
        match tokio::fs::write(&self.dump_path, stdout).await {
            Ok(()) => {
                info!(pid = %pid, path = %self.dump_path.display(), "Wrote stack dump");
                Some(self.dump_path.clone())
            }
            Err(e) => {
                warn!(path = %self.dump_path.display(), error = %e, "Failed to write stack dump");
                None
            }
        }
    }

    async fn capture(&self, spec: &CommandSpec) -> Option<String> {
        match self.runner.run(spec).await {
            Ok(output) if output.success() => Some(output.stdout),
            Ok(output) => {
                warn!(command = %spec, exit_code = ?output.code, "Diagnostic command failed");
                None
            }
            Err(e) => {
                warn!(command = %spec, error = %e, "Diagnostic command unavailable");
                None
            }
        }
    }
}

fn parse_first_pid(stdout: &str) -> Option<u32> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse().ok())
}
