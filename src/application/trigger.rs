//! Profile-trigger fan-out.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{ActivitySet, StartProfileRequest, WorkerAddress};
use crate::error::StageError;
use crate::port::ServerClient;

/// Result of triggering one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerResult {
    pub address: WorkerAddress,
    pub outcome: Result<(), StageError>,
}

/// Sends `start_profile` to every target worker.
#[derive(Clone)]
pub struct ProfileTrigger {
    client: Arc<dyn ServerClient>,
}

impl ProfileTrigger {
    pub fn new(client: Arc<dyn ServerClient>) -> Self {
        Self { client }
    }

    /// Create the profile output directory for the chosen activity set.
    pub async fn prepare_output_dir(activities: &ActivitySet) -> Result<(), StageError> {
        let dir = activities.output_dir();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StageError::Io {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;
        info!(dir = %dir.display(), "Profile output directory ready");
        Ok(())
    }

    /// Trigger every target in order. A failure never stops the fan-out.
    pub async fn trigger_all(
        &self,
        targets: &[WorkerAddress],
        request: &StartProfileRequest,
    ) -> Vec<TriggerResult> {
        let mut results = Vec::with_capacity(targets.len());
        for address in targets {
            info!(
                address = %address,
                role = %address.role(),
                start_step = %request.start_step,
                num_steps = request.num_steps,
                "Starting profiler"
            );
            let outcome = self.client.start_profile(address, request).await;
            if let Err(e) = &outcome {
                error!(address = %address, error = %e, "Failed to start profiler");
            }
            results.push(TriggerResult {
                address: address.clone(),
                outcome,
            });
        }
        results
    }
}
