//! Readiness waiter.
//!
//! Polls `GET <url>/health` until it answers 200, with a bounded deadline
//! and cancellation through the shutdown watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::adapter::StallDiagnostics;
use crate::config::ReadinessConfig;
use crate::error::ReadinessError;
use crate::port::ServerClient;

/// Polling cadence and deadline of a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl ReadinessPolicy {
    #[must_use]
    pub fn from_config(config: &ReadinessConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            timeout: config.timeout(),
        }
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self::from_config(&ReadinessConfig::default())
    }
}

/// Blocks until endpoints report healthy.
#[derive(Clone)]
pub struct ReadinessWaiter {
    client: Arc<dyn ServerClient>,
    policy: ReadinessPolicy,
    diagnostics: Option<StallDiagnostics>,
}

impl ReadinessWaiter {
    pub fn new(client: Arc<dyn ServerClient>, policy: ReadinessPolicy) -> Self {
        Self {
            client,
            policy,
            diagnostics: None,
        }
    }

    /// Collect stall diagnostics after every failed probe.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: StallDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Wait for one endpoint. Returns the number of probes it took.
    ///
    /// # Errors
    ///
    /// - [`ReadinessError::Timeout`] when sleeping again would pass the deadline
    /// - [`ReadinessError::Cancelled`] as soon as `shutdown` turns `true`
    pub async fn wait(
        &self,
        base_url: &str,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<u32, ReadinessError> {
        let started = Instant::now();
        let mut attempts = 0u32;
        let cancelled = || ReadinessError::Cancelled {
            url: base_url.to_string(),
        };

        info!(url = %base_url, "Waiting for server to become ready");
        loop {
            if *shutdown.borrow() {
                return Err(cancelled());
            }
            attempts += 1;

            let status = tokio::select! {
                status = self.client.probe_health(base_url) => status,
                () = shutdown_requested(shutdown) => return Err(cancelled()),
            };
            if status.is_healthy() {
                info!(url = %base_url, attempts, "Server is ready");
                return Ok(attempts);
            }

            warn!(
                url = %base_url,
                status = %status.code(),
                attempt = attempts,
                retry_in = ?self.policy.poll_interval,
                "Server not ready"
            );
            if let Some(diagnostics) = &self.diagnostics {
                tokio::select! {
                    _ = diagnostics.collect() => {}
                    () = shutdown_requested(shutdown) => return Err(cancelled()),
                }
            }

            let elapsed = started.elapsed();
            if elapsed + self.policy.poll_interval > self.policy.timeout {
                return Err(ReadinessError::Timeout {
                    url: base_url.to_string(),
                    attempts,
                    elapsed,
                });
            }

            tokio::select! {
                () = sleep(self.policy.poll_interval) => {}
                () = shutdown_requested(shutdown) => return Err(cancelled()),
            }
        }
    }

    /// Wait for each endpoint in order, stopping at the first error.
    pub async fn wait_all(
        &self,
        base_urls: &[String],
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<(), ReadinessError> {
        for url in base_urls {
            self.wait(url, shutdown).await?;
        }
        Ok(())
    }
}

/// Resolves once the shutdown flag is `true`. Never resolves if the sender
/// is gone without having flipped it.
pub(crate) async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
