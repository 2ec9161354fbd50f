//! Logging initialization
//!
//! Installs the global `tracing` subscriber: an `EnvFilter` (`RUST_LOG`
//! overrides the configured directive) and a text or JSON formatter.

mod logging;

pub use logging::{LoggingConfig, TelemetryError, init_logging};
