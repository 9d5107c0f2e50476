//! HTTP port towards the router and worker servers.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{StartProfileRequest, WorkerAddress};
use crate::error::StageError;

/// Outcome of a single `GET <url>/health` probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Bare 200.
    Healthy,
    /// Any other HTTP status.
    Status(u16),
    /// No HTTP response at all.
    Unreachable(String),
}

impl ProbeStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Three-digit status label; `000` when the endpoint did not answer.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Healthy => "200".to_string(),
            Self::Status(status) => format!("{status:03}"),
            Self::Unreachable(_) => "000".to_string(),
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(reason) => write!(f, "000 ({reason})"),
            other => f.write_str(&other.code()),
        }
    }
}

/// Client for the inference servers' control endpoints.
#[async_trait]
pub trait ServerClient: Send + Sync {
    /// Probe `GET <base_url>/health` once.
    async fn probe_health(&self, base_url: &str) -> ProbeStatus;

    /// `POST /start_profile` on a worker.
    ///
    /// Any non-2xx answer is an error.
    async fn start_profile(
        &self,
        address: &WorkerAddress,
        request: &StartProfileRequest,
    ) -> Result<(), StageError>;
}
