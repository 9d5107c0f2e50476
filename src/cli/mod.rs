//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Profrun - Profiling run orchestrator for prefill/decode inference servers.
#[derive(Parser, Debug)]
#[command(name = "profrun")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wait for servers, start profiling and drive the workload
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `profrun check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate environment and settings without contacting any server
    Config(SettingsArg),
    /// Probe every endpoint once
    Health(SettingsArg),
}

/// Shared argument for commands that only need the settings file.
#[derive(Parser, Debug)]
pub struct SettingsArg {
    /// Path to optional TOML settings file
    #[arg(short, long)]
    pub settings: Option<PathBuf>,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Number of prefill workers (logged only)
    pub n_prefill: Option<u32>,

    /// Number of decode workers (logged only)
    pub n_decode: Option<u32>,

    /// GPUs per prefill worker (logged only)
    pub prefill_gpus: Option<u32>,

    /// GPUs per decode worker (logged only)
    pub decode_gpus: Option<u32>,

    /// Total GPUs in the job (logged only)
    pub total_gpus: Option<u32>,

    /// Path to optional TOML settings file
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override seconds between health probes
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Override seconds to wait for each endpoint
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Do not collect process diagnostics while waiting
    #[arg(long)]
    pub no_diagnostics: bool,
}
