//! Run-independent domain types: roles, addresses, activities, step windows.

mod activity;
mod address;
mod mode;
mod request;
mod step;

pub use activity::{Activity, ActivitySet};
pub use address::{parse_address_list, WorkerAddress, WorkerRole, DEFAULT_WORKER_PORT};
pub use mode::{ProfilingMode, PREFILL_MODE};
pub use request::StartProfileRequest;
pub use step::{StepWindow, DEFAULT_START_STEP, DEFAULT_STOP_STEP};
