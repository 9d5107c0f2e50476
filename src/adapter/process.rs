//! `tokio::process` implementation of [`ProcessRunner`].

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::StageError;
use crate::port::{CommandOutput, CommandSpec, ProcessRunner};

/// Runs commands as child processes of the orchestrator.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, StageError> {
        debug!(command = %command, "Spawning process");
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null()).kill_on_drop(true);

        let spawn_err = |e: std::io::Error| StageError::Spawn {
            program: command.program.clone(),
            reason: e.to_string(),
        };

        if command.capture {
            let output = cmd
                .stderr(Stdio::null())
                .output()
                .await
                .map_err(spawn_err)?;
            Ok(CommandOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            })
        } else {
            let status = cmd.status().await.map_err(spawn_err)?;
            Ok(CommandOutput {
                code: status.code(),
                stdout: String::new(),
            })
        }
    }
}
