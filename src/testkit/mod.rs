//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`journal`] - Shared, ordered record of every call made through a port.
//! - [`client`] - Scripted [`ServerClient`](crate::port::ServerClient).
//! - [`runner`] - Scripted [`ProcessRunner`](crate::port::ProcessRunner).
//! - [`config`] - Canonical fast settings and run configurations.

pub mod client;
pub mod config;
pub mod journal;
pub mod runner;
