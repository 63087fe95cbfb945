//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geocoding_port;
mod incident_port;
mod routing_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::{GeocodeMatch, GeocodingPort};
#[cfg(test)]
pub use incident_port::MockIncidentPort;
pub use incident_port::IncidentPort;
#[cfg(test)]
pub use routing_port::MockRoutingPort;
pub use routing_port::{RouteQuery, RoutingPort};
