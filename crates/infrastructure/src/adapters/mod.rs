//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod geocoding_adapter;
mod incident_adapter;
mod routing_adapter;

pub use geocoding_adapter::GeocodingAdapter;
pub use incident_adapter::IncidentAdapter;
pub use routing_adapter::RoutingAdapter;
