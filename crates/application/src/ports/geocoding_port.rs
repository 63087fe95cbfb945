//! Geocoding service port
//!
//! Resolves free-text place names that the local gazetteer does not know.

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Best match returned by a geocoder
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    /// Coordinates of the match
    pub location: GeoLocation,
    /// Short display name
    pub name: String,
    /// Fully qualified name
    pub full_name: String,
}

/// Port for remote geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Whether the geocoder can be used at all
    fn is_available(&self) -> bool;

    /// Resolve a place name within a country (ISO code)
    ///
    /// Returns `Ok(None)` when the geocoder found nothing.
    async fn geocode(
        &self,
        query: &str,
        country: &str,
    ) -> Result<Option<GeocodeMatch>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GeocodingPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingPort>();
    }
}
