//! Routing service port
//!
//! Defines how the application asks for a route. The adapter behind it drives
//! the remote providers in fallback order.

use async_trait::async_trait;
use domain::{GeoLocation, ProviderId, ProviderStatus, RouteResult, TravelMode};
#[cfg(test)]
use mockall::automock;

/// A routing request between two coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuery {
    /// Start point
    pub origin: GeoLocation,
    /// End point
    pub destination: GeoLocation,
    /// Travel mode
    pub mode: TravelMode,
    /// Provider to try first for this request, if usable
    pub preferred_provider: Option<ProviderId>,
}

impl RouteQuery {
    /// Create a new routing query
    #[must_use]
    pub const fn new(origin: GeoLocation, destination: GeoLocation, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            mode,
            preferred_provider: None,
        }
    }

    /// Set the provider override
    #[must_use]
    pub const fn with_preferred_provider(mut self, provider: Option<ProviderId>) -> Self {
        self.preferred_provider = provider;
        self
    }
}

/// Port for remote routing
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Route through the available providers
    ///
    /// Returns `None` when no provider could answer; provider failures never
    /// surface as errors.
    async fn route(&self, query: &RouteQuery) -> Option<RouteResult>;

    /// Configuration status of every provider
    fn provider_status(&self) -> ProviderStatus;
}
