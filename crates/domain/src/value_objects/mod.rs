//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod provider_id;
mod travel_mode;

pub use geo_location::{EARTH_RADIUS_METERS, GeoLocation};
pub use provider_id::ProviderId;
pub use travel_mode::TravelMode;
