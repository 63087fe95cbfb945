#![forbid(unsafe_code)]
//! Routing provider integration
//!
//! Aggregates several remote routing services behind one contract and
//! degrades gracefully when they fail or lack credentials.
//!
//! # Architecture
//!
//! Every remote service is wrapped in a client implementing [`ProviderClient`]:
//! [`MapboxClient`], [`GoogleMapsClient`], [`MapMyIndiaClient`] and
//! [`OsrmClient`]. Each client translates its own auth scheme, request shape and
//! response schema into the normalized [`domain::RouteResult`].
//!
//! [`RoutingConfig`] derives from the available credentials which providers are
//! usable and computes the fallback chain (preferred provider first if usable,
//! other usable providers next, OSRM always last). [`RouterManager`] walks that
//! chain sequentially and returns the first route it gets.
//!
//! [`MapboxGeocoder`] resolves free-text place names through the Mapbox
//! Geocoding API.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::{GeoLocation, TravelMode};
//! use integration_routing::{RouterManager, RoutingConfig};
//!
//! let config = RoutingConfig::from_env();
//! let manager = RouterManager::new(&config)?;
//!
//! let origin = GeoLocation::new(12.9166, 77.6101)?;
//! let destination = GeoLocation::new(12.9716, 77.5946)?;
//! if let Some(route) = manager.route(origin, destination, TravelMode::Car, None).await {
//!     println!("{} m via {}", route.distance_meters, route.provider_used);
//! }
//! ```

mod config;
mod error;
mod geocoding;
mod google;
mod http;
mod manager;
mod mapbox;
mod mapmyindia;
mod osrm;
mod osrm_format;
mod provider;
mod token;

pub use config::{RoutingConfig, build_fallback_chain, env_vars};
pub use error::RoutingError;
pub use geocoding::{
    GeocodedPlace, GeocodingClient, GeocodingError, MapboxGeocoder, MapboxGeocoderConfig,
};
pub use google::GoogleMapsClient;
pub use manager::RouterManager;
pub use mapbox::MapboxClient;
pub use mapmyindia::MapMyIndiaClient;
pub use osrm::OsrmClient;
pub use provider::ProviderClient;
