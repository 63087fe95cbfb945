//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on top of the routing
//! integration, loads configuration, installs logging and wires the services.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::{
    Services, build_mobility_event_service, build_route_planning_service, build_services,
};
pub use config::{AppConfig, ConfigError};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_tracing};
