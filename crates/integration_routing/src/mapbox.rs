//! Mapbox Directions API client
//!
//! Client for the Mapbox Directions API v5
//! (<https://docs.mapbox.com/api/navigation/directions/>).

use async_trait::async_trait;
use domain::{GeoLocation, ProviderId, RouteResult, TravelMode};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument};

use crate::{
    config::RoutingConfig, error::RoutingError, http, osrm_format::RouteResponse,
    provider::ProviderClient,
};

/// Mapbox Directions API client
#[derive(Debug, Clone)]
pub struct MapboxClient {
    client: Client,
    access_token: Option<SecretString>,
    base_url: String,
    timeout_secs: u64,
}

impl MapboxClient {
    /// Create a new Mapbox client
    ///
    /// A missing access token is not an error here: the client then reports
    /// itself unconfigured and refuses every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let access_token = config
            .is_configured(ProviderId::Mapbox)
            .then(|| config.mapbox_api_key.clone())
            .flatten();

        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            access_token,
            base_url: config.mapbox_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Mapbox routing profile for a travel mode
    #[must_use]
    pub const fn profile(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Car | TravelMode::Transit => "driving",
            TravelMode::Bike => "cycling",
            TravelMode::Walk => "walking",
        }
    }

    fn route_url(&self, origin: GeoLocation, destination: GeoLocation, mode: TravelMode) -> String {
        format!(
            "{}/directions/v5/mapbox/{}/{};{}",
            self.base_url,
            Self::profile(mode),
            origin.lon_lat_pair(),
            destination.lon_lat_pair()
        )
    }
}

#[async_trait]
impl ProviderClient for MapboxClient {
    fn id(&self) -> ProviderId {
        ProviderId::Mapbox
    }

    fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }

    #[instrument(skip(self), fields(provider = "mapbox"))]
    async fn route(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        mode: TravelMode,
    ) -> Result<RouteResult, RoutingError> {
        let Some(token) = self.access_token.as_ref() else {
            debug!("Mapbox client not configured, skipping");
            return Err(RoutingError::NotConfigured(ProviderId::Mapbox));
        };

        let url = self.route_url(origin, destination, mode);
        debug!(url = %url, "Sending Mapbox Directions request");

        let request = self.client.get(&url).query(&[
            ("geometries", "polyline6"),
            ("steps", "true"),
            ("overview", "full"),
            ("access_token", token.expose_secret()),
        ]);

        let response: RouteResponse = http::send_json(request, self.timeout_secs).await?;
        let route = response.into_route(ProviderId::Mapbox)?;

        info!(
            distance_m = route.distance_meters,
            duration_s = route.duration_seconds,
            "Mapbox route retrieved"
        );
        Ok(route)
    }
}
