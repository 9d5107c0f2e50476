//! Profiler activity selection.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A profiler activity understood by the worker's `/start_profile` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activity {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "MEM")]
    Mem,
    #[serde(rename = "CUDA_PROFILER")]
    CudaProfiler,
}

impl Activity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Gpu => "GPU",
            Self::Mem => "MEM",
            Self::CudaProfiler => "CUDA_PROFILER",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activities and output directory chosen once for every trigger of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySet {
    activities: Vec<Activity>,
    output_dir: PathBuf,
}

impl ActivitySet {
    /// Torch profiler activities when an output directory is configured,
    /// otherwise the CUDA profiler writing under `<logs_dir>/profiles`.
    pub fn select(profiler_dir: Option<&Path>, logs_dir: &Path) -> Self {
        match profiler_dir {
            Some(dir) => Self {
                activities: vec![Activity::Cpu, Activity::Gpu, Activity::Mem],
                output_dir: dir.to_path_buf(),
            },
            None => Self {
                activities: vec![Activity::CudaProfiler],
                output_dir: logs_dir.join("profiles"),
            },
        }
    }

    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
