//! OSRM routing client
//!
//! Client for the OSRM HTTP route service (<https://project-osrm.org/>).
//! Needs no credentials and is always the last provider in the fallback chain.

use async_trait::async_trait;
use domain::{GeoLocation, ProviderId, RouteResult, TravelMode};
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::{
    config::RoutingConfig, error::RoutingError, http, osrm_format::RouteResponse,
    provider::ProviderClient,
};

/// OSRM route service client
#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl OsrmClient {
    /// Create a new OSRM client from the routing configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        Self::with_base_url(&config.osrm_base_url, config.timeout_secs)
    }

    /// Create a client against a specific server
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, RoutingError> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// OSRM profile for a travel mode
    #[must_use]
    pub const fn profile(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Car | TravelMode::Transit => "driving",
            TravelMode::Bike => "bicycle",
            TravelMode::Walk => "foot",
        }
    }

    fn route_url(&self, origin: GeoLocation, destination: GeoLocation, mode: TravelMode) -> String {
        format!(
            "{}/route/v1/{}/{};{}",
            self.base_url,
            Self::profile(mode),
            origin.lon_lat_pair(),
            destination.lon_lat_pair()
        )
    }
}

#[async_trait]
impl ProviderClient for OsrmClient {
    fn id(&self) -> ProviderId {
        ProviderId::Osrm
    }

    fn is_configured(&self) -> bool {
        true
    }

    #[instrument(skip(self), fields(provider = "osrm"))]
    async fn route(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        mode: TravelMode,
    ) -> Result<RouteResult, RoutingError> {
        let url = self.route_url(origin, destination, mode);
        debug!(url = %url, "Sending OSRM route request");

        let request = self.client.get(&url).query(&[
            ("overview", "full"),
            ("geometries", "polyline6"),
            ("steps", "true"),
        ]);

        let response: RouteResponse = http::send_json(request, self.timeout_secs).await?;
        let route = response.into_route(ProviderId::Osrm)?;

        info!(
            distance_m = route.distance_meters,
            duration_s = route.duration_seconds,
            "OSRM route retrieved"
        );
        Ok(route)
    }
}
