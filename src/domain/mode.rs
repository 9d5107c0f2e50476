//! Operating mode dispatch.

use std::fmt;

/// Mode string that enables the router wait and the load/eval workload.
pub const PREFILL_MODE: &str = "prefill";

/// Operating mode of one orchestrator instance.
///
/// Chosen once from `PROFILING_MODE` and fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Prefill node: waits on the router and drives load plus evaluation.
    Prefill,
    /// Any other value, including unset (decode nodes and the like).
    Other(String),
}

impl ProfilingMode {
    /// Parse a raw mode value. Only the exact string `prefill` is distinguished.
    pub fn parse(raw: &str) -> Self {
        if raw == PREFILL_MODE {
            Self::Prefill
        } else {
            Self::Other(raw.to_string())
        }
    }

    #[must_use]
    pub fn is_prefill(&self) -> bool {
        matches!(self, Self::Prefill)
    }
}

impl Default for ProfilingMode {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for ProfilingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefill => f.write_str(PREFILL_MODE),
            Self::Other(raw) if raw.is_empty() => f.write_str("<unset>"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}
