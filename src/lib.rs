//! Profrun - profiling run orchestrator for disaggregated inference serving.
//!
//! Waits for the router and the prefill/decode workers of an already running
//! inference deployment to report healthy, starts server-side profiling on
//! every worker, and on prefill nodes drives a synthetic load plus a short
//! evaluation against the router.
//!
//! # Modules
//!
//! - [`config`] - Run configuration from the environment, TOML settings
//! - [`domain`] - Modes, worker addresses, profiler activities, step windows
//! - [`port`] - Traits for HTTP and sub-process seams
//! - [`adapter`] - `reqwest`/`tokio::process` implementations, diagnostics
//! - [`application`] - Readiness, trigger fan-out, workload, orchestration
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use profrun::adapter::{HttpServerClient, TokioProcessRunner};
//! use profrun::application::Orchestrator;
//! use profrun::config::{RunConfig, Settings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let config = RunConfig::from_env()?;
//! let client = Arc::new(HttpServerClient::new(settings.readiness.request_timeout()));
//! let orchestrator = Orchestrator::new(config, settings, client, Arc::new(TokioProcessRunner));
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let report = orchestrator.run(shutdown_rx).await;
//! std::process::exit(report.exit_code());
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
