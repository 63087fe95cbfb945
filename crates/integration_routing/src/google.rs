//! Google Maps Directions API client
//!
//! Client for the Google Maps Directions API
//! (<https://developers.google.com/maps/documentation/directions>).
//! Google reports most failures with HTTP 200 and a `status` field in the body.

use async_trait::async_trait;
use domain::{GeoLocation, ProviderId, RouteResult, RouteStep, TravelMode};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use crate::{config::RoutingConfig, error::RoutingError, http, provider::ProviderClient};

/// Google Directions API response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct DirectionsResponse {
        pub status: String,
        #[serde(default)]
        pub error_message: Option<String>,
        #[serde(default)]
        pub routes: Vec<Route>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Route {
        #[serde(default)]
        pub overview_polyline: Option<Polyline>,
        #[serde(default)]
        pub legs: Vec<Leg>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Polyline {
        #[serde(default)]
        pub points: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Leg {
        #[serde(default)]
        pub distance: Option<TextValue>,
        #[serde(default)]
        pub duration: Option<TextValue>,
        #[serde(default)]
        pub steps: Vec<Step>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Step {
        #[serde(default)]
        pub html_instructions: String,
        #[serde(default)]
        pub distance: Option<TextValue>,
        #[serde(default)]
        pub duration: Option<TextValue>,
        #[serde(default)]
        pub start_location: Option<LatLng>,
    }

    #[derive(Debug, Deserialize)]
    pub struct TextValue {
        pub value: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct LatLng {
        pub lat: f64,
        pub lng: f64,
    }
}

/// Google Maps Directions API client
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: Option<SecretString>,
    base_url: String,
    timeout_secs: u64,
}

impl GoogleMapsClient {
    /// Create a new Google Maps client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let api_key = config
            .is_configured(ProviderId::Google)
            .then(|| config.google_maps_api_key.clone())
            .flatten();

        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            api_key,
            base_url: config.google_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Google travel mode for a travel mode
    #[must_use]
    pub const fn profile(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Car => "driving",
            TravelMode::Bike => "bicycling",
            TravelMode::Walk => "walking",
            TravelMode::Transit => "transit",
        }
    }

    /// Classify the body status and normalize the first route
    fn convert_response(response: api::DirectionsResponse) -> Result<RouteResult, RoutingError> {
        let detail = response
            .error_message
            .clone()
            .unwrap_or_else(|| response.status.clone());

        match response.status.as_str() {
            "OK" => {},
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(RoutingError::NoRoute(detail)),
            "REQUEST_DENIED" => return Err(RoutingError::AuthenticationFailed(detail)),
            "OVER_QUERY_LIMIT" => {
                return Err(RoutingError::RateLimitExceeded {
                    retry_after_secs: None,
                });
            },
            _ => return Err(RoutingError::RequestFailed(detail)),
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRoute("no routes returned".to_string()))?;

        let geometry = route
            .overview_polyline
            .map(|p| p.points)
            .unwrap_or_default();

        let distance = route
            .legs
            .iter()
            .filter_map(|l| l.distance.as_ref())
            .map(|d| d.value)
            .sum();
        let duration = route
            .legs
            .iter()
            .filter_map(|l| l.duration.as_ref())
            .map(|d| d.value)
            .sum();

        let steps = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|step| {
                let mut converted = RouteStep::new(
                    strip_markup(&step.html_instructions),
                    step.distance.map_or(0.0, |d| d.value),
                    step.duration.map_or(0.0, |d| d.value),
                );
                if let Some(location) = step
                    .start_location
                    .and_then(|l| GeoLocation::new(l.lat, l.lng).ok())
                {
                    converted = converted.with_location(location);
                }
                converted
            })
            .collect();

        Ok(RouteResult::new(
            ProviderId::Google,
            geometry,
            distance,
            duration,
            steps,
        ))
    }
}

/// Remove HTML tags and common entities from an instruction
fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                // Block elements separate sentences
                text.push(' ');
            },
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {},
        }
    }

    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl ProviderClient for GoogleMapsClient {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self), fields(provider = "google"))]
    async fn route(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        mode: TravelMode,
    ) -> Result<RouteResult, RoutingError> {
        let Some(key) = self.api_key.as_ref() else {
            debug!("Google Maps client not configured, skipping");
            return Err(RoutingError::NotConfigured(ProviderId::Google));
        };

        let url = format!("{}/directions/json", self.base_url);
        debug!(url = %url, "Sending Google Directions request");

        let origin = origin.lat_lon_pair();
        let destination = destination.lat_lon_pair();
        let request = self.client.get(&url).query(&[
            ("origin", origin.as_str()),
            ("destination", destination.as_str()),
            ("mode", Self::profile(mode)),
            ("key", key.expose_secret()),
        ]);

        let response: api::DirectionsResponse = http::send_json(request, self.timeout_secs).await?;
        let status = response.status.clone();

        match Self::convert_response(response) {
            Ok(route) => {
                info!(
                    distance_m = route.distance_meters,
                    duration_s = route.duration_seconds,
                    "Google route retrieved"
                );
                Ok(route)
            },
            Err(e) => {
                warn!(status = %status, error = %e, "Google Directions returned no usable route");
                Err(e)
            },
        }
    }
}
