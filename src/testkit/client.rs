//! Scripted server client.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::journal::{Journal, Recorded};
use crate::domain::{StartProfileRequest, WorkerAddress};
use crate::error::StageError;
use crate::port::{ProbeStatus, ServerClient};

/// Records every call; health answers come from per-URL queues.
///
/// A URL whose queue is empty (or was never scripted) answers healthy.
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    journal: Journal,
    probes: Arc<Mutex<HashMap<String, VecDeque<ProbeStatus>>>>,
    always_down: Arc<Mutex<HashMap<String, ProbeStatus>>>,
    rejections: HashMap<String, u16>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record into a journal shared with other fakes.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// `base_url` answers 503 for the first `failures` probes.
    #[must_use]
    pub fn healthy_after(self, base_url: &str, failures: usize) -> Self {
        self.probes
            .lock()
            .expect("lock probes")
            .entry(base_url.to_string())
            .or_default()
            .extend(std::iter::repeat(ProbeStatus::Status(503)).take(failures));
        self
    }

    /// `base_url` never becomes healthy.
    #[must_use]
    pub fn never_healthy(self, base_url: &str) -> Self {
        self.always_down.lock().expect("lock probes").insert(
            base_url.to_string(),
            ProbeStatus::Unreachable("connection refused".to_string()),
        );
        self
    }

    /// `/start_profile` on `address` answers `status`.
    #[must_use]
    pub fn reject(mut self, address: &str, status: u16) -> Self {
        self.rejections.insert(address.to_string(), status);
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

#[async_trait]
impl ServerClient for RecordingClient {
    async fn probe_health(&self, base_url: &str) -> ProbeStatus {
        self.journal.push(Recorded::Health(base_url.to_string()));
        if let Some(status) = self.always_down.lock().expect("lock probes").get(base_url) {
            return status.clone();
        }
        self.probes
            .lock()
            .expect("lock probes")
            .get_mut(base_url)
            .and_then(VecDeque::pop_front)
            .unwrap_or(ProbeStatus::Healthy)
    }

    async fn start_profile(
        &self,
        address: &WorkerAddress,
        request: &StartProfileRequest,
    ) -> Result<(), StageError> {
        let address = address.to_string();
        self.journal.push(Recorded::StartProfile {
            address: address.clone(),
            request: request.clone(),
        });
        match self.rejections.get(&address) {
            Some(&status) => Err(StageError::Rejected { address, status }),
            None => Ok(()),
        }
    }
}
