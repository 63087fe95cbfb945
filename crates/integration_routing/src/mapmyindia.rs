//! MapMyIndia routing client
//!
//! Client for the MapMyIndia advanced maps `route_adv` API. Authenticates
//! either with a REST key embedded in the path or with an OAuth bearer token
//! obtained through the client-credentials grant. Every travel mode is
//! requested with the `driving` profile.

use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoLocation, MobilityEvent, ProviderId, RouteResult, TravelMode};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::RoutingConfig,
    error::RoutingError,
    http,
    osrm_format::RouteResponse,
    provider::ProviderClient,
    token::{DEFAULT_TOKEN_LIFETIME, IssuedToken, TokenCache},
};

/// Profile segment of the `route_adv` path
const ROUTE_PROFILE: &str = "driving";

/// OAuth token endpoint response
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct TokenResponse {
        #[serde(default)]
        pub access_token: String,
        #[serde(default)]
        pub expires_in: Option<u64>,
    }
}

/// OAuth client-credentials state
#[derive(Debug)]
struct OAuthCredentials {
    client_id: SecretString,
    client_secret: SecretString,
    token_url: String,
    token_client: Client,
    token_timeout_secs: u64,
    tokens: TokenCache,
}

#[derive(Debug)]
enum Auth {
    /// REST key embedded in the request path
    Key(SecretString),
    /// Bearer token from the client-credentials grant
    OAuth(Box<OAuthCredentials>),
    None,
}

/// MapMyIndia routing client
#[derive(Debug)]
pub struct MapMyIndiaClient {
    client: Client,
    auth: Auth,
    base_url: String,
    timeout_secs: u64,
}

impl MapMyIndiaClient {
    /// Create a new MapMyIndia client
    ///
    /// The REST key wins when both a key and an OAuth client pair are present.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be created.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let key = config
            .mapmyindia_api_key
            .clone()
            .filter(|k| !k.expose_secret().trim().is_empty());

        let auth = match (key, config.has_mapmyindia_oauth()) {
            (Some(key), _) => Auth::Key(key),
            (None, true) => match (
                config.mapmyindia_client_id.clone(),
                config.mapmyindia_client_secret.clone(),
            ) {
                (Some(client_id), Some(client_secret)) => Auth::OAuth(Box::new(OAuthCredentials {
                    client_id,
                    client_secret,
                    token_url: config.mapmyindia_token_url.clone(),
                    token_client: http::build_client(config.token_timeout_secs)?,
                    token_timeout_secs: config.token_timeout_secs,
                    tokens: TokenCache::new(),
                })),
                _ => Auth::None,
            },
            (None, false) => Auth::None,
        };

        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            auth,
            base_url: config.mapmyindia_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Whether requests use the OAuth bearer flow
    #[must_use]
    pub const fn uses_oauth(&self) -> bool {
        matches!(self.auth, Auth::OAuth(_))
    }

    fn coordinates(origin: GeoLocation, destination: GeoLocation) -> String {
        format!("{};{}", origin.lon_lat_pair(), destination.lon_lat_pair())
    }

    /// Traffic incidents near a location
    ///
    /// The upstream incidents endpoint is not integrated, so a configured
    /// client reports the capability as unavailable.
    ///
    /// # Errors
    ///
    /// Always returns an error: `NotConfigured` without credentials,
    /// `CapabilityUnavailable` otherwise.
    pub async fn nearby_incidents(
        &self,
        location: GeoLocation,
        radius_km: u32,
    ) -> Result<Vec<MobilityEvent>, RoutingError> {
        if !self.is_configured() {
            return Err(RoutingError::NotConfigured(ProviderId::MapMyIndia));
        }
        debug!(%location, radius_km, "MapMyIndia incidents requested");
        Err(RoutingError::CapabilityUnavailable(
            "MapMyIndia nearby incidents are not available".to_string(),
        ))
    }

    async fn fetch_token(oauth: &OAuthCredentials) -> Result<IssuedToken, RoutingError> {
        debug!("Requesting MapMyIndia access token");

        let request = oauth.token_client.post(&oauth.token_url).form(&[
            ("grant_type", "client_credentials"),
            ("client_id", oauth.client_id.expose_secret()),
            ("client_secret", oauth.client_secret.expose_secret()),
        ]);

        let response: api::TokenResponse = http::send_json(request, oauth.token_timeout_secs)
            .await
            .inspect_err(|e| warn!(error = %e, "MapMyIndia token request failed"))?;

        if response.access_token.is_empty() {
            return Err(RoutingError::AuthenticationFailed(
                "token endpoint returned no access_token".to_string(),
            ));
        }

        Ok(IssuedToken {
            token: SecretString::from(response.access_token),
            expires_in: response
                .expires_in
                .map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs),
        })
    }

    async fn route_with_key(
        &self,
        key: &SecretString,
        coordinates: &str,
    ) -> Result<RouteResponse, RoutingError> {
        let url = format!(
            "{}/{}/route_adv/{ROUTE_PROFILE}/{coordinates}",
            self.base_url,
            key.expose_secret()
        );
        // The key is part of the path, so the URL is never logged
        debug!("Sending MapMyIndia route request (key auth)");

        let request = self.client.get(&url).query(&[
            ("steps", "true"),
            ("geometries", "polyline6"),
            ("overview", "full"),
        ]);
        http::send_json(request, self.timeout_secs).await
    }

    async fn route_with_token(
        &self,
        oauth: &OAuthCredentials,
        coordinates: &str,
    ) -> Result<RouteResponse, RoutingError> {
        let token = oauth
            .tokens
            .get_or_refresh(|| Self::fetch_token(oauth))
            .await?;

        let url = format!("{}/route_adv/{ROUTE_PROFILE}/{coordinates}", self.base_url);
        debug!(url = %url, "Sending MapMyIndia route request (bearer auth)");

        let request = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .query(&[
                ("steps", "true"),
                ("geometries", "polyline6"),
                ("overview", "full"),
            ]);

        let result = http::send_json(request, self.timeout_secs).await;
        if matches!(result, Err(RoutingError::AuthenticationFailed(_))) {
            // Token rejected before its expiry; fetch a fresh one next time
            oauth.tokens.invalidate().await;
        }
        result
    }
}

#[async_trait]
impl ProviderClient for MapMyIndiaClient {
    fn id(&self) -> ProviderId {
        ProviderId::MapMyIndia
    }

    fn is_configured(&self) -> bool {
        !matches!(self.auth, Auth::None)
    }

    #[instrument(skip(self), fields(provider = "mapmyindia"))]
    async fn route(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        mode: TravelMode,
    ) -> Result<RouteResult, RoutingError> {
        let coordinates = Self::coordinates(origin, destination);
        if mode != TravelMode::Car {
            debug!(%mode, "route_adv only serves the driving profile");
        }

        let response = match &self.auth {
            Auth::Key(key) => self.route_with_key(key, &coordinates).await?,
            Auth::OAuth(oauth) => self.route_with_token(oauth, &coordinates).await?,
            Auth::None => {
                debug!("MapMyIndia client not configured, skipping");
                return Err(RoutingError::NotConfigured(ProviderId::MapMyIndia));
            },
        };

        let route = response.into_route(ProviderId::MapMyIndia)?;
        info!(
            distance_m = route.distance_meters,
            duration_s = route.duration_seconds,
            "MapMyIndia route retrieved"
        );
        Ok(route)
    }
}
