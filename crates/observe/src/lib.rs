//! This crate contains the code required to observe a running directory:
//! initialization logic for logging and metrics shared by the binaries and
//! their tests.
pub mod config;
pub mod metrics;
pub mod tracing;

pub use config::Config;
