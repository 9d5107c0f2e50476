//! `reqwest` implementation of [`ServerClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use tracing::{debug, warn};

use crate::domain::{StartProfileRequest, WorkerAddress};
use crate::error::StageError;
use crate::port::{ProbeStatus, ServerClient};

/// HTTP client for router and worker control endpoints.
pub struct HttpServerClient {
    http: HttpClient,
}

impl HttpServerClient {
    /// Build a client whose requests give up after `request_timeout`.
    #[must_use]
    pub fn new(request_timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self { http }
    }
}

#[async_trait]
impl ServerClient for HttpServerClient {
    async fn probe_health(&self, base_url: &str) -> ProbeStatus {
        let url = format!("{base_url}/health");
        match self.http.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => ProbeStatus::Healthy,
            Ok(response) => ProbeStatus::Status(response.status().as_u16()),
            Err(err) => {
                debug!(url = %url, error = %err, "Health probe got no response");
                ProbeStatus::Unreachable(err.to_string())
            }
        }
    }

    async fn start_profile(
        &self,
        address: &WorkerAddress,
        request: &StartProfileRequest,
    ) -> Result<(), StageError> {
        let url = format!("{}/start_profile", address.base_url());
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| StageError::Http {
                address: address.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StageError::Rejected {
                address: address.to_string(),
                status: status.as_u16(),
            })
        }
    }
}
