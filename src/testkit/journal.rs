//! Ordered record of port calls shared across fakes.

use std::sync::{Arc, Mutex};

use crate::domain::StartProfileRequest;
use crate::port::CommandSpec;

/// One call observed by a recording fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Health(String),
    StartProfile {
        address: String,
        request: StartProfileRequest,
    },
    Command(CommandSpec),
}

/// Thread-safe call log. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<Recorded>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: Recorded) {
        self.entries.lock().expect("lock journal").push(entry);
    }

    pub fn entries(&self) -> Vec<Recorded> {
        self.entries.lock().expect("lock journal").clone()
    }

    /// URLs of every health probe, in order.
    pub fn health_probes(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Recorded::Health(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Worker addresses of every profile trigger, in order.
    pub fn triggers(&self) -> Vec<(String, StartProfileRequest)> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Recorded::StartProfile { address, request } => Some((address, request)),
                _ => None,
            })
            .collect()
    }

    /// Every sub-process invocation, in order.
    pub fn commands(&self) -> Vec<CommandSpec> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Recorded::Command(spec) => Some(spec),
                _ => None,
            })
            .collect()
    }
}
