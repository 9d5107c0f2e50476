//! Worker addresses parsed from comma-separated lists.

use std::fmt;

/// Port every worker's HTTP server listens on when the list entry has none.
pub const DEFAULT_WORKER_PORT: u16 = 30000;

/// Serving role of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    Prefill,
    Decode,
    /// Local worker used when no address list is configured.
    Fallback,
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefill => f.write_str("prefill"),
            Self::Decode => f.write_str("decode"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// A `host:port` worker endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerAddress {
    host: String,
    port: u16,
    role: WorkerRole,
}

impl WorkerAddress {
    pub fn new(host: impl Into<String>, port: u16, role: WorkerRole) -> Self {
        Self {
            host: host.into(),
            port,
            role,
        }
    }

    /// The local worker used when both lists are empty.
    pub fn fallback() -> Self {
        Self::new("127.0.0.1", DEFAULT_WORKER_PORT, WorkerRole::Fallback)
    }

    /// Parse a single list entry. Returns `None` for blank entries.
    ///
    /// `10.0.0.1` becomes `10.0.0.1:30000`; `10.0.0.1:31000` keeps its port.
    /// A trailing segment that is not a valid port is treated as part of the host.
    pub fn parse(entry: &str, role: WorkerRole) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        if let Some((host, port)) = entry.rsplit_once(':') {
            if let Ok(port) = port.parse::<u16>() {
                if !host.is_empty() {
                    return Some(Self::new(host, port, role));
                }
            }
        }
        Some(Self::new(entry, DEFAULT_WORKER_PORT, role))
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn role(&self) -> WorkerRole {
        self.role
    }

    /// Base URL of the worker's HTTP server.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for WorkerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse a comma-separated address list, skipping empty entries.
pub fn parse_address_list(raw: &str, role: WorkerRole) -> Vec<WorkerAddress> {
    raw.split(',')
        .filter_map(|entry| WorkerAddress::parse(entry, role))
        .collect()
}
