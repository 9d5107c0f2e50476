//! Trait definitions for the external seams of a run.
//!
//! Everything the orchestrator does to the outside world goes through one
//! of these ports, so the run logic can be driven by recording fakes.
//!
//! - [`ServerClient`] - health probes and profile triggers over HTTP
//! - [`ProcessRunner`] - sub-process invocation (benchmark, installer,
//!   evaluation harness, diagnostics tools)

mod process;
mod server;

pub use process::{CommandOutput, CommandSpec, ProcessRunner};
pub use server::{ProbeStatus, ServerClient};
