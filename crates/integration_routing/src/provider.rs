//! Routing provider trait

use async_trait::async_trait;
use domain::{GeoLocation, ProviderId, RouteResult, TravelMode};

use crate::error::RoutingError;

/// Trait for routing provider implementations
///
/// Any `Err` means the provider is unavailable for this request; the caller
/// moves on to the next provider.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Identity of this provider
    fn id(&self) -> ProviderId;

    /// Whether the client holds the credentials it needs
    fn is_configured(&self) -> bool;

    /// Request a route between two points
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::NotConfigured` without any network traffic when
    /// credentials are absent, otherwise the classified upstream failure.
    async fn route(
        &self,
        origin: GeoLocation,
        destination: GeoLocation,
        mode: TravelMode,
    ) -> Result<RouteResult, RoutingError>;
}
