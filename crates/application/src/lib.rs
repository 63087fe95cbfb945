//! Application layer - Use cases and orchestration
//!
//! Contains the route planning and mobility event use cases plus the port
//! definitions they depend on. Adapters in the infrastructure layer
//! implement the ports on top of the routing integration.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
