//! Logging infrastructure
//!
//! Installs the `tracing` subscriber with an env-driven filter and a plain or
//! JSON formatter.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, init_tracing};
