//! Traffic incident port

use async_trait::async_trait;
use domain::{GeoLocation, MobilityEvent};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for live traffic incidents near a location
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IncidentPort: Send + Sync {
    /// Fetch incidents within `radius_km` of `location`
    ///
    /// `ApplicationError::NotConfigured` and
    /// `ApplicationError::CapabilityUnavailable` mean no live feed exists.
    async fn nearby_incidents(
        &self,
        location: &GeoLocation,
        radius_km: u32,
    ) -> Result<Vec<MobilityEvent>, ApplicationError>;
}
