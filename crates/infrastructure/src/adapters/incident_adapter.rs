//! Incident adapter - Implements IncidentPort using the MapMyIndia client

use application::error::ApplicationError;
use application::ports::IncidentPort;
use async_trait::async_trait;
use domain::{GeoLocation, MobilityEvent};
use integration_routing::{MapMyIndiaClient, RoutingConfig, RoutingError};
use tracing::instrument;

/// Adapter for live traffic incidents
#[derive(Debug)]
pub struct IncidentAdapter {
    client: MapMyIndiaClient,
}

impl IncidentAdapter {
    /// Wrap an existing client
    #[must_use]
    pub const fn new(client: MapMyIndiaClient) -> Self {
        Self { client }
    }

    /// Create the client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, ApplicationError> {
        let client =
            MapMyIndiaClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::new(client))
    }

    fn map_error(err: RoutingError) -> ApplicationError {
        match err {
            RoutingError::NotConfigured(provider) => {
                ApplicationError::NotConfigured(format!("{} has no credentials", provider.label()))
            },
            RoutingError::CapabilityUnavailable(e) => ApplicationError::CapabilityUnavailable(e),
            RoutingError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            RoutingError::ConfigurationError(e) => ApplicationError::Configuration(e),
            other => ApplicationError::ExternalService(other.to_string()),
        }
    }
}

#[async_trait]
impl IncidentPort for IncidentAdapter {
    #[instrument(skip(self))]
    async fn nearby_incidents(
        &self,
        location: &GeoLocation,
        radius_km: u32,
    ) -> Result<Vec<MobilityEvent>, ApplicationError> {
        self.client
            .nearby_incidents(*location, radius_km)
            .await
            .map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[tokio::test]
    async fn unconfigured_client_is_not_configured() {
        let adapter = IncidentAdapter::from_config(&RoutingConfig::for_testing()).unwrap();
        let err = adapter
            .nearby_incidents(&GeoLocation::bangalore_center(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotConfigured(_)));
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn configured_client_reports_unavailable_capability() {
        let config = RoutingConfig {
            mapmyindia_api_key: Some(SecretString::from("mmi-key")),
            ..RoutingConfig::for_testing()
        };
        let adapter = IncidentAdapter::from_config(&config).unwrap();
        let err = adapter
            .nearby_incidents(&GeoLocation::bangalore_center(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::CapabilityUnavailable(_)));
        assert!(!err.to_string().contains("mmi-key"));
    }

    #[test]
    fn transport_errors_are_external() {
        let err = IncidentAdapter::map_error(RoutingError::Timeout { timeout_secs: 5 });
        assert!(matches!(err, ApplicationError::ExternalService(_)));
    }
}
