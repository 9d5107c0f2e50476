//! Implementations of ports against the real world.

pub mod diagnostic;
pub mod http;
pub mod process;

pub use diagnostic::StallDiagnostics;
pub use http::HttpServerClient;
pub use process::TokioProcessRunner;
