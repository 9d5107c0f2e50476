use std::time::Duration;

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read settings file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors that end a readiness wait without the endpoint becoming healthy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("{url} not ready after {attempts} attempts ({elapsed:?})")]
    Timeout {
        url: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("readiness wait for {url} cancelled")]
    Cancelled { url: String },
}

/// Failure of a single external call inside a run stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("request to {address} failed: {reason}")]
    Http { address: String, reason: String },

    #[error("{address} rejected request with status {status}")]
    Rejected { address: String, status: u16 },

    #[error("failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with {}", .code.map_or_else(|| "signal".to_string(), |c| format!("code {c}")))]
    CommandFailed { program: String, code: Option<i32> },

    #[error("io error at {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Errors that end a command before or outside of a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("connection error: {0}")]
    Connection(String),
}

pub type Result<T> = std::result::Result<T, Error>;
