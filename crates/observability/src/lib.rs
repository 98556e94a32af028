//! Process-wide tracing/logging setup for surtido binaries and tests.

pub mod tracing_init;

pub use tracing_init::init;
