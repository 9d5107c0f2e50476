//! Sub-process port.

use std::fmt;

use async_trait::async_trait;

use crate::error::StageError;

/// A program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Capture stdout instead of inheriting the parent's stdio.
    pub capture: bool,
}

impl CommandSpec {
    /// Invocation whose output streams straight to the parent's stdio.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            capture: false,
        }
    }

    /// Same invocation with stdout captured into [`CommandOutput::stdout`].
    #[must_use]
    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Captured stdout, empty unless the command was captured.
    pub stdout: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`StageError::CommandFailed`].
    pub fn check(self, program: &str) -> Result<Self, StageError> {
        if self.success() {
            Ok(self)
        } else {
            Err(StageError::CommandFailed {
                program: program.to_string(),
                code: self.code,
            })
        }
    }
}

/// Runs external programs to completion.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Spawn `command` and wait for it to exit.
    ///
    /// Only a failure to spawn or wait is an error; a non-zero exit is
    /// reported through [`CommandOutput::code`].
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, StageError>;
}
