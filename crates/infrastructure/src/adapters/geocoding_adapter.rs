//! Geocoding adapter - Implements GeocodingPort using the Mapbox geocoder

use application::error::ApplicationError;
use application::ports::{GeocodeMatch, GeocodingPort};
use async_trait::async_trait;
use integration_routing::{GeocodingClient, GeocodingError, MapboxGeocoder, MapboxGeocoderConfig};
use tracing::{debug, instrument};

/// Adapter for remote place name resolution
#[derive(Debug)]
pub struct GeocodingAdapter {
    geocoder: MapboxGeocoder,
}

impl GeocodingAdapter {
    /// Wrap an existing geocoder
    #[must_use]
    pub const fn new(geocoder: MapboxGeocoder) -> Self {
        Self { geocoder }
    }

    /// Create the geocoder from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &MapboxGeocoderConfig) -> Result<Self, ApplicationError> {
        let geocoder =
            MapboxGeocoder::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::new(geocoder))
    }

    /// Map integration geocoding error to application error
    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::NotConfigured => {
                ApplicationError::NotConfigured("Mapbox geocoder has no access token".into())
            },
            GeocodingError::ConnectionFailed(e) | GeocodingError::RequestFailed(e) => {
                ApplicationError::ExternalService(e)
            },
            GeocodingError::Timeout => {
                ApplicationError::ExternalService("Geocoding request timed out".into())
            },
            GeocodingError::ParseError(e) => ApplicationError::Internal(e),
            GeocodingError::AuthenticationFailed => {
                ApplicationError::Configuration("Geocoding access token was rejected".into())
            },
            GeocodingError::RateLimitExceeded => ApplicationError::RateLimited,
            GeocodingError::PlaceNotFound(e) => ApplicationError::Internal(e),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    fn is_available(&self) -> bool {
        self.geocoder.is_configured()
    }

    #[instrument(skip(self))]
    async fn geocode(
        &self,
        query: &str,
        country: &str,
    ) -> Result<Option<GeocodeMatch>, ApplicationError> {
        match self.geocoder.geocode(query, country).await {
            Ok(place) => Ok(Some(GeocodeMatch {
                location: place.location,
                name: place.name,
                full_name: place.full_name,
            })),
            Err(GeocodingError::PlaceNotFound(reason)) => {
                debug!(%reason, "No geocoding match");
                Ok(None)
            },
            Err(e) => Err(Self::map_error(e)),
        }
    }
}
