//! Scripted process runner.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::journal::{Journal, Recorded};
use crate::error::StageError;
use crate::port::{CommandOutput, CommandSpec, ProcessRunner};

/// Records every invocation and answers from a per-program script.
///
/// Programs without a scripted answer exit 0 with empty output.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    journal: Journal,
    responses: HashMap<String, CommandOutput>,
    spawn_failures: HashSet<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record into a journal shared with other fakes.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Answer every run of `program` with `output`.
    #[must_use]
    pub fn respond(mut self, program: &str, output: CommandOutput) -> Self {
        self.responses.insert(program.to_string(), output);
        self
    }

    /// Make every run of `program` exit with `code`.
    #[must_use]
    pub fn exit_with(self, program: &str, code: i32) -> Self {
        self.respond(
            program,
            CommandOutput {
                code: Some(code),
                stdout: String::new(),
            },
        )
    }

    /// Make `program` fail to spawn.
    #[must_use]
    pub fn fail_spawn(mut self, program: &str) -> Self {
        self.spawn_failures.insert(program.to_string());
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.journal.commands()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|spec| spec.program).collect()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, StageError> {
        self.journal.push(Recorded::Command(command.clone()));
        if self.spawn_failures.contains(&command.program) {
            return Err(StageError::Spawn {
                program: command.program.clone(),
                reason: "not found".to_string(),
            });
        }
        Ok(self
            .responses
            .get(&command.program)
            .cloned()
            .unwrap_or(CommandOutput {
                code: Some(0),
                stdout: String::new(),
            }))
    }
}
