//! Configuration and endpoint validation commands.

mod config;
mod health;

pub use config::execute_config;
pub use health::execute_health;
