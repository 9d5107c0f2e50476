//! Body of the worker `POST /start_profile` call.

use serde::Serialize;

use super::{Activity, ActivitySet, StepWindow};

/// JSON body accepted by a worker's `/start_profile` endpoint.
///
/// `start_step` travels as a string; the worker parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartProfileRequest {
    pub start_step: String,
    pub num_steps: u64,
    pub activities: Vec<Activity>,
}

impl StartProfileRequest {
    pub fn new(window: StepWindow, activities: &ActivitySet) -> Self {
        Self {
            start_step: window.start().to_string(),
            num_steps: window.num_steps(),
            activities: activities.activities().to_vec(),
        }
    }
}
