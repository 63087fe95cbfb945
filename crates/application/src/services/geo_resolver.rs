//! Place name resolution
//!
//! Resolves a free-text place name to a coordinate through a tiered strategy:
//! exact gazetteer match, partial gazetteer match, remote geocoder, and
//! finally a configured default location. Resolution never fails.

use std::fmt;
use std::sync::Arc;

use domain::{GeoLocation, PlaceSource, ResolvedPlace};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::ports::GeocodingPort;
use crate::services::gazetteer::{GazetteerEntry, lookup_exact, lookup_partial};

/// Configuration for place resolution
#[derive(Debug, Clone, Deserialize)]
pub struct GeoResolverConfig {
    /// ISO country code the remote geocoder is scoped to
    #[serde(default = "default_country")]
    pub country: String,

    /// Location used when nothing else matches
    #[serde(default = "GeoLocation::bangalore_center")]
    pub default_location: GeoLocation,
}

fn default_country() -> String {
    "in".to_string()
}

impl Default for GeoResolverConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            default_location: GeoLocation::bangalore_center(),
        }
    }
}

/// Tiered place name resolver
pub struct GeoResolver {
    geocoder: Option<Arc<dyn GeocodingPort>>,
    config: GeoResolverConfig,
}

impl fmt::Debug for GeoResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoResolver")
            .field("has_geocoder", &self.geocoder.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for GeoResolver {
    fn default() -> Self {
        Self::new(GeoResolverConfig::default())
    }
}

impl GeoResolver {
    /// Create a resolver without a remote geocoder
    #[must_use]
    pub const fn new(config: GeoResolverConfig) -> Self {
        Self {
            geocoder: None,
            config,
        }
    }

    /// Attach a remote geocoder for names the gazetteer does not know
    #[must_use]
    pub fn with_geocoder(mut self, geocoder: Arc<dyn GeocodingPort>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    fn from_gazetteer(entry: &GazetteerEntry) -> ResolvedPlace {
        ResolvedPlace::new(entry.location, entry.display, PlaceSource::Gazetteer)
    }

    /// Resolve a place name to a coordinate
    #[instrument(skip(self))]
    pub async fn resolve(&self, place_name: &str) -> ResolvedPlace {
        let trimmed = place_name.trim();

        if trimmed.is_empty() {
            debug!("Empty place name, using default location");
            return self.fallback(trimmed);
        }

        if let Some(entry) = lookup_exact(trimmed) {
            debug!(display = entry.display, "Exact gazetteer match");
            return Self::from_gazetteer(entry);
        }

        if let Some(entry) = lookup_partial(trimmed) {
            debug!(display = entry.display, "Partial gazetteer match");
            return Self::from_gazetteer(entry);
        }

        if let Some(place) = self.geocode(trimmed).await {
            return place;
        }

        self.fallback(trimmed)
    }

    async fn geocode(&self, name: &str) -> Option<ResolvedPlace> {
        let Some(geocoder) = self.geocoder.as_ref().filter(|g| g.is_available()) else {
            warn!(%name, "Geocoder not configured, cannot resolve unknown place");
            return None;
        };

        info!(%name, "Place not in gazetteer, using remote geocoder");
        match geocoder.geocode(name, &self.config.country).await {
            Ok(Some(found)) => {
                info!(%name, display = %found.name, "Geocoded place");
                Some(
                    ResolvedPlace::new(found.location, found.name, PlaceSource::Geocoder)
                        .with_full_name(found.full_name),
                )
            },
            Ok(None) => {
                warn!(%name, "Geocoder found no match");
                None
            },
            Err(e) => {
                warn!(%name, error = %e, "Geocoding failed");
                None
            },
        }
    }

    fn fallback(&self, name: &str) -> ResolvedPlace {
        warn!(%name, "Falling back to default location");
        ResolvedPlace::new(
            self.config.default_location,
            title_case(name),
            PlaceSource::Default,
        )
    }
}

/// Capitalize the first letter of every word and lower-case the rest
///
/// Any non-alphabetic character starts a new word.
pub(crate) fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::{GeocodeMatch, MockGeocodingPort};

    fn unavailable_geocoder() -> Arc<MockGeocodingPort> {
        let mut mock = MockGeocodingPort::new();
        mock.expect_is_available().return_const(false);
        mock.expect_geocode().never();
        Arc::new(mock)
    }

    #[tokio::test]
    async fn exact_match_returns_stored_coordinate() {
        let resolver = GeoResolver::default();
        let place = resolver.resolve("mg ROAD").await;
        assert_eq!(place.display, "MG Road");
        assert_eq!(place.source, PlaceSource::Gazetteer);
        assert!((place.location.latitude() - 12.9716).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn partial_match_returns_first_entry() {
        let resolver = GeoResolver::default();
        let place = resolver.resolve("BTM").await;
        assert_eq!(place.display, "BTM Layout");
        assert_eq!(place.source, PlaceSource::Gazetteer);
    }

    #[tokio::test]
    async fn unknown_name_without_geocoder_uses_default() {
        let resolver = GeoResolver::default().with_geocoder(unavailable_geocoder());
        let place = resolver.resolve("new delhi").await;
        assert_eq!(place.display, "New Delhi");
        assert_eq!(place.source, PlaceSource::Default);
        assert_eq!(place.location, GeoLocation::bangalore_center());
    }

    #[tokio::test]
    async fn empty_name_skips_geocoder() {
        let resolver = GeoResolver::default().with_geocoder(unavailable_geocoder());
        let place = resolver.resolve("   ").await;
        assert_eq!(place.display, "");
        assert_eq!(place.source, PlaceSource::Default);
    }

    #[tokio::test]
    async fn geocoder_match_is_used() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_is_available().return_const(true);
        mock.expect_geocode()
            .withf(|query, country| {
                query.to_string() == "Visakhapatnam" && country.to_string() == "in"
            })
            .times(1)
            .returning(|_, _| {
                Ok(Some(GeocodeMatch {
                    location: GeoLocation::new(17.6868, 83.2185).unwrap(),
                    name: "Visakhapatnam".to_string(),
                    full_name: "Visakhapatnam, Andhra Pradesh, India".to_string(),
                }))
            });

        let resolver = GeoResolver::default().with_geocoder(Arc::new(mock));
        let place = resolver.resolve(" Visakhapatnam ").await;
        assert_eq!(place.source, PlaceSource::Geocoder);
        assert_eq!(place.display, "Visakhapatnam");
        assert_eq!(
            place.full_name.as_deref(),
            Some("Visakhapatnam, Andhra Pradesh, India")
        );
    }

    #[tokio::test]
    async fn geocoder_failure_falls_back_to_configured_default() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_is_available().return_const(true);
        mock.expect_geocode()
            .returning(|_, _| Err(ApplicationError::ExternalService("timeout".to_string())));

        let default_location = GeoLocation::new(28.6139, 77.2090).unwrap();
        let resolver = GeoResolver::new(GeoResolverConfig {
            country: "in".to_string(),
            default_location,
        })
        .with_geocoder(Arc::new(mock));

        let place = resolver.resolve("atlantis lost city").await;
        assert_eq!(place.location, default_location);
        assert_eq!(place.display, "Atlantis Lost City");
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("new delhi"), "New Delhi");
        assert_eq!(title_case("SECTOR-17 market"), "Sector-17 Market");
        assert_eq!(title_case(""), "");
    }
}
