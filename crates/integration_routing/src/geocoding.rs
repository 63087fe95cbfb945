//! Mapbox geocoding client
//!
//! Converts free-form place names to coordinates using the
//! [Mapbox Geocoding API](https://docs.mapbox.com/api/search/geocoding/).
//! Results are cached (24h TTL by default) to minimize API calls.

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Configuration for the Mapbox geocoding service
#[derive(Debug, Clone, Deserialize)]
pub struct MapboxGeocoderConfig {
    /// Mapbox access token (geocoding is disabled without it)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Base URL for the Mapbox API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// ISO country code results are restricted to
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_geocoding_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    5
}

/// Longest accepted cache TTL (one year)
const MAX_CACHE_TTL_HOURS: u64 = 24 * 365;

const fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_country() -> String {
    "in".to_string()
}

impl Default for MapboxGeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            country: default_country(),
        }
    }
}

impl MapboxGeocoderConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_hours: 0,
            ..Default::default()
        }
    }

    /// Whether an access token is present
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if Url::parse(&self.base_url).is_err() {
            return Err("base_url must be a valid URL".to_string());
        }
        if self.country.len() != 2 {
            return Err("country must be a two-letter ISO code".to_string());
        }
        if self.cache_ttl_hours > MAX_CACHE_TTL_HOURS {
            return Err(format!("cache_ttl_hours must be at most {MAX_CACHE_TTL_HOURS}"));
        }
        Ok(())
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// No access token configured
    #[error("Geocoding is not configured")]
    NotConfigured,

    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Place could not be resolved to coordinates
    #[error("Place not found: {0}")]
    PlaceNotFound(String),

    /// The access token was rejected
    #[error("Geocoding authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

/// A geocoded place
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    /// Coordinates of the best match
    pub location: GeoLocation,
    /// Short name (e.g. "Visakhapatnam")
    pub name: String,
    /// Fully qualified name (e.g. "Visakhapatnam, Andhra Pradesh, India")
    pub full_name: String,
}

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve a free-form place name within a country
    async fn geocode(&self, query: &str, country: &str) -> Result<GeocodedPlace, GeocodingError>;

    /// Resolve several names one after another
    ///
    /// Failed lookups map to `None` instead of aborting the batch.
    async fn geocode_batch(
        &self,
        queries: &[String],
        country: &str,
    ) -> Vec<(String, Option<GeocodedPlace>)> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            let place = self.geocode(query, country).await.ok();
            results.push((query.clone(), place));
        }
        results
    }
}

/// Raw Mapbox geocoding response
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    place_name: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
    /// `[lon, lat]`, used when `geometry` is absent
    #[serde(default)]
    center: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

impl Feature {
    fn coordinates(&self) -> Option<(f64, f64)> {
        let coords = self
            .geometry
            .as_ref()
            .map_or(self.center.as_slice(), |g| g.coordinates.as_slice());
        match coords {
            [lon, lat, ..] => Some((*lon, *lat)),
            _ => None,
        }
    }
}

/// Mapbox-based geocoding client with caching
#[derive(Debug)]
pub struct MapboxGeocoder {
    client: Client,
    config: MapboxGeocoderConfig,
    cache: Cache<String, GeocodedPlace>,
}

impl MapboxGeocoder {
    /// Create a new Mapbox geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &MapboxGeocoderConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache_ttl = if config.cache_ttl_hours > 0 {
            Duration::from_secs(config.cache_ttl_hours.min(MAX_CACHE_TTL_HOURS) * 3600)
        } else {
            Duration::from_secs(1)
        };

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        if !config.is_configured() {
            warn!("Mapbox geocoder initialized without API key");
        }

        Ok(Self {
            client,
            config: config.clone(),
            cache,
        })
    }

    /// Whether the geocoder has an access token
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Default country scope from the configuration
    #[must_use]
    pub fn default_country(&self) -> &str {
        &self.config.country
    }

    /// Build `{base}/geocoding/v5/mapbox.places/{query}.json` with the query
    /// percent-encoded as a single path segment
    fn build_url(&self, query: &str) -> Result<Url, GeocodingError> {
        let file = format!("{query}.json");
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| GeocodingError::RequestFailed(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| GeocodingError::RequestFailed("base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places", file.as_str()]);
        Ok(url)
    }
}

#[async_trait]
impl GeocodingClient for MapboxGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str, country: &str) -> Result<GeocodedPlace, GeocodingError> {
        let Some(token) = self.config.api_key.as_ref().filter(|_| self.is_configured()) else {
            debug!("Mapbox geocoder not configured, skipping");
            return Err(GeocodingError::NotConfigured);
        };

        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodingError::PlaceNotFound(
                "Place name must not be empty".to_string(),
            ));
        }

        let cache_key = format!("{}:{}", country.to_lowercase(), query.to_lowercase());
        if let Some(place) = self.cache.get(&cache_key).await {
            debug!(%query, "Geocoding cache hit");
            return Ok(place);
        }

        let url = self.build_url(query)?;
        debug!(%query, %country, "Geocoding place");

        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", token.expose_secret()),
                ("country", country),
                ("limit", "1"),
                ("types", "place,locality,address"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.without_url().to_string())
                }
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GeocodingError::AuthenticationFailed);
            },
            StatusCode::TOO_MANY_REQUESTS => return Err(GeocodingError::RateLimitExceeded),
            status if !status.is_success() => {
                return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
            },
            _ => {},
        }

        let collection: FeatureCollection = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.without_url().to_string()))?;

        let feature = collection
            .features
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::PlaceNotFound(query.to_string()))?;

        let (lon, lat) = feature
            .coordinates()
            .ok_or_else(|| GeocodingError::ParseError("feature has no coordinates".to_string()))?;
        let location =
            GeoLocation::new(lat, lon).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let full_name = feature.place_name.unwrap_or_else(|| query.to_string());
        let name = feature.text.unwrap_or_else(|| full_name.clone());
        let place = GeocodedPlace {
            location,
            name,
            full_name,
        };

        self.cache.insert(cache_key, place.clone()).await;
        info!(%query, name = %place.name, %location, "Geocoded place");

        Ok(place)
    }
}
