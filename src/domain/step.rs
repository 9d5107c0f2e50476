//! Profiling step window.

/// Default first profiled step.
pub const DEFAULT_START_STEP: u64 = 0;
/// Default step at which profiling stops.
pub const DEFAULT_STOP_STEP: u64 = 50;

/// Half-open `[start, stop)` window of forward steps to profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepWindow {
    start: u64,
    stop: u64,
}

impl StepWindow {
    /// Returns `None` when `stop < start`.
    pub fn new(start: u64, stop: u64) -> Option<Self> {
        (stop >= start).then_some(Self { start, stop })
    }

    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[must_use]
    pub fn stop(&self) -> u64 {
        self.stop
    }

    #[must_use]
    pub fn num_steps(&self) -> u64 {
        self.stop - self.start
    }
}

impl Default for StepWindow {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_STEP,
            stop: DEFAULT_STOP_STEP,
        }
    }
}
